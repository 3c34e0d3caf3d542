mod session;

pub use session::{MaybeSession, Session, Staff};

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request;
use serde::de;

use crate::error::Error;

/// Extractor that deserializes a urlencoded form body.
///
/// Validation is left to the handler, which re-renders the form with field
/// errors instead of rejecting the request.
///
/// ```rust
/// async fn route(Form(input): Form<CommentForm>) {
///   // ...
/// }
/// ```
pub struct Form<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for Form<T>
where
	T: de::DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let result = axum::extract::Form::<T>::from_request(req, state).await?.0;

		Ok(Self(result))
	}
}

/// Extractor that deserializes a query string.
///
/// This is similar to [`Form<T>`], but does not consume the body. When a
/// parameter is repeated, its last value is used.
pub struct Query<T>(pub T);

/// Keeps only the last occurrence of every key of a raw query string.
fn last_values(query: &str) -> String {
	let mut pairs: Vec<(&str, &str)> = Vec::new();

	for pair in query.split('&').filter(|pair| !pair.is_empty()) {
		let key = pair.split_once('=').map_or(pair, |(key, _)| key);

		pairs.retain(|(existing, _)| *existing != key);
		pairs.push((key, pair));
	}

	pairs
		.into_iter()
		.map(|(_, pair)| pair)
		.collect::<Vec<_>>()
		.join("&")
}

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
	T: de::DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		_state: &S,
	) -> Result<Self, Self::Rejection> {
		let query = last_values(parts.uri.query().unwrap_or_default());

		Ok(Self(serde_urlencoded::from_str(&query)?))
	}
}

/// Extractor that deserializes path parameters.
///
/// A parameter that does not parse (e.g. a malformed post id) can never name an
/// existing entity, so it is reported as not found rather than as a bad request.
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
	T: de::DeserializeOwned + Send,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let result = axum::extract::Path::<T>::from_request_parts(parts, state)
			.await
			.map_err(|_| Error::NotFound("page"))?
			.0;

		Ok(Self(result))
	}
}

#[cfg(test)]
mod test {
	use super::last_values;

	#[test]
	fn test_last_values() {
		assert_eq!(last_values(""), "");
		assert_eq!(last_values("page=2"), "page=2");
		assert_eq!(last_values("page=1&page=2"), "page=2");
		assert_eq!(last_values("page=1&q=rust&page=3&"), "q=rust&page=3");
		assert_eq!(last_values("flag&flag=on"), "flag=on");
	}
}
