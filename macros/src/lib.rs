mod model;

use proc_macro::TokenStream;

/// Creates a `XForm` struct next to the model `X`, holding the fields a user may submit.
///
/// Fields with `#[serde(skip_deserializing)]` or `#[serde(skip)]` are left out. The
/// remaining fields keep their `doc`, `serde` and `validate` attributes, so the
/// validation rules are declared once on the model and enforced on the form.
#[proc_macro_attribute]
pub fn model(_args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(input)
}
