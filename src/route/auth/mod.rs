use axum::routing::get;

use crate::AppState;

pub mod model;
pub mod route;
mod view;

/// An error that can occur during authentication.
///
/// Note that the messages are shown as form errors, so they should not contain
/// sensitive information. Only hashing failures reach [`crate::Error`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid username or password")]
	InvalidUsernameOrPassword,
	#[error("password validation error")]
	Argon(#[from] argon2::Error),
	#[error("username already taken")]
	UsernameTaken,
	#[error("email already taken")]
	EmailTaken,
}

impl Error {
	/// The form field an error is reported on when a form is re-rendered.
	pub fn field(&self) -> &'static str {
		match self {
			Self::UsernameTaken => "username",
			Self::EmailTaken => "email",
			Self::InvalidUsernameOrPassword | Self::Argon(..) => "__all__",
		}
	}
}

pub fn routes() -> axum::Router<AppState> {
	use route::*;

	axum::Router::new()
		.route("/auth/signup/", get(signup_form).post(signup))
		.route("/auth/login/", get(login_form).post(login))
		.route("/auth/logout/", get(logout))
}
