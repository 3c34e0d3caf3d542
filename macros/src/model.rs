use darling::{ast, FromDeriveInput, FromField};
use proc_macro2::TokenTree;
use quote::{format_ident, quote, ToTokens};
use syn::Meta;

/// Attributes copied from a model field onto the generated form field.
const FORWARDED: [&str; 3] = ["doc", "serde", "validate"];

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named))]
struct ModelInputReceiver {
	ident: syn::Ident,

	data: ast::Data<(), ModelFieldReceiver>,
}

#[derive(Debug, FromField)]
#[darling(forward_attrs)]
struct ModelFieldReceiver {
	ident: Option<syn::Ident>,

	ty: syn::Type,

	attrs: Vec<syn::Attribute>,
}

impl ModelFieldReceiver {
	/// Whether the field carries `#[serde(skip_deserializing)]` or `#[serde(skip)]`.
	fn is_server_owned(&self) -> bool {
		self.attrs.iter().any(|attr| {
			let Meta::List(ref list) = attr.meta else {
				return false;
			};

			if !list.path.is_ident("serde") {
				return false;
			}

			list.tokens.to_token_stream().into_iter().any(|token| {
				matches!(token, TokenTree::Ident(ref ident) if ident == "skip_deserializing" || ident == "skip")
			})
		})
	}

	fn forwarded_attrs(&self) -> impl Iterator<Item = &syn::Attribute> {
		self.attrs
			.iter()
			.filter(|attr| FORWARDED.iter().any(|name| attr.path().is_ident(name)))
	}
}

pub fn from_input(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = syn::parse_macro_input!(input as syn::DeriveInput);
	let receiver = match ModelInputReceiver::from_derive_input(&input) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	let ident = &receiver.ident;
	let vis = &input.vis;
	let form_ident = format_ident!("{}Form", ident);

	let Some(fields) = receiver.data.take_struct() else {
		return syn::Error::new_spanned(&input, "expected a struct with named fields")
			.into_compile_error()
			.into();
	};

	let form_fields = fields
		.iter()
		.filter(|field| !field.is_server_owned())
		.filter_map(|field| {
			let ident = field.ident.as_ref()?;
			let ty = &field.ty;
			let attrs = field.forwarded_attrs();

			Some(quote! {
				#(#attrs)*
				pub #ident: #ty,
			})
		});

	quote! {
		#input

		#[doc = concat!("The user-submitted fields of [`", stringify!(#ident), "`].")]
		#[derive(Debug, Default, Clone, ::serde::Deserialize, ::validator::Validate)]
		#vis struct #form_ident {
			#(
				#form_fields
			)*
		}
	}
	.into()
}
