use axum::{
	body::Body,
	extract::{multipart::MultipartError, rejection},
	http::{Response, StatusCode},
	response::IntoResponse,
};
use tower_governor::GovernorError;

use crate::{media, page, route::auth};

/// Error type for the application.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} not found")]
	NotFound(&'static str),
	#[error("login required to access {next}")]
	LoginRequired { next: String },
	#[error("auth error: {0}")]
	Auth(#[from] auth::Error),
	#[error("form error: {0}")]
	Form(#[from] rejection::FormRejection),
	#[error("query error: {0}")]
	Query(#[from] serde_urlencoded::de::Error),
	#[error("multipart error: {0}")]
	Multipart(#[from] MultipartError),
	#[error("media error: {0}")]
	Media(#[from] media::Error),
	#[error("rate limited: {0:?}")]
	RateLimit(GovernorError),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl From<GovernorError> for Error {
	fn from(error: GovernorError) -> Self {
		Self::RateLimit(error)
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		match self {
			Error::NotFound(..) => page::not_found(None),
			Error::LoginRequired { next } => page::login_redirect(&next),
			Error::Form(..) | Error::Query(..) | Error::Multipart(..) => {
				tracing::debug!(error = %self, "malformed request");
				page::error(StatusCode::BAD_REQUEST, "The request could not be understood.")
			}
			Error::RateLimit(..) => page::error(
				StatusCode::TOO_MANY_REQUESTS,
				"Too many requests, please slow down.",
			),
			_ => {
				tracing::error!(error = %self, "request failed");
				page::server_error()
			}
		}
	}
}

#[cfg(test)]
mod test {
	use axum::{http::header, response::IntoResponse};

	use super::*;

	#[test]
	fn test_error_pages() {
		let response = Error::NotFound("post").into_response();
		assert_eq!(response.status(), StatusCode::NOT_FOUND);

		let response = Error::LoginRequired {
			next: "/new/".into(),
		}
		.into_response();
		assert_eq!(response.status(), StatusCode::FOUND);
		assert_eq!(
			response.headers()[header::LOCATION],
			"/auth/login/?next=%2Fnew%2F"
		);

		let response = Error::from(auth::Error::Argon(argon2::Error::PwdTooLong)).into_response();
		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

		let query = serde_urlencoded::from_str::<Vec<(u8, u8)>>("x=y").unwrap_err();
		let response = Error::from(query).into_response();
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}
}
