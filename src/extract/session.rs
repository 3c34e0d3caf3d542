use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};
use uuid::Uuid;

use crate::{error::Error, route::auth::model::User, session, Database};

/// Extracts the session and related user from the request.
///
/// Routes that take a [`Session`] require a logged-in user: without a valid
/// session cookie the request is redirected to the login page, which returns
/// to the requested path afterwards.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub id: Uuid,
	pub user: User,
}

/// The current user, possibly absent.
///
/// Unlike [`Session`], a missing or stale cookie is not an error.
#[derive(Debug)]
pub struct MaybeSession(pub Option<Session>);

impl MaybeSession {
	pub fn user(&self) -> Option<&User> {
		self.0.as_ref().map(|session| &session.user)
	}
}

/// Resolves the session cookie of a request, if any.
async fn load(parts: &request::Parts, database: &Database) -> Result<Option<Session>, Error> {
	let cookies = parts
		.headers
		.get_all(header::COOKIE)
		.into_iter()
		.filter_map(|value| value.to_str().ok());

	let Some(session_id) = cookies
		.flat_map(cookie::Cookie::split_parse)
		.filter_map(Result::ok)
		.find(|cookie| cookie.name() == session::COOKIE_NAME)
	else {
		return Ok(None);
	};

	let Ok(session_id) = Uuid::parse_str(session_id.value()) else {
		return Ok(None);
	};

	let user = sqlx::query_as::<_, User>(
		r#"
			SELECT * FROM "user" WHERE id = (
				SELECT user_id FROM session WHERE id = $1
			)
		"#,
	)
	.bind(session_id)
	.fetch_optional(database)
	.await?;

	Ok(user.map(|user| Session {
		id: session_id,
		user,
	}))
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let database = Database::from_ref(state);

		load(parts, &database).await?.ok_or_else(|| Error::LoginRequired {
			next: parts
				.uri
				.path_and_query()
				.map_or_else(|| parts.uri.path().to_owned(), ToString::to_string),
		})
	}
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeSession
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let database = Database::from_ref(state);

		Ok(Self(load(parts, &database).await?))
	}
}

/// A [`Session`] whose user is staff.
///
/// Anyone else is sent to the login page, as if they were not logged in.
#[derive(Debug)]
pub struct Staff(pub Session);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Staff
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let session = Session::from_request_parts(parts, state).await?;

		if !session.user.is_staff {
			tracing::debug!(user = %session.user.username, "non-staff user refused from admin");

			return Err(Error::LoginRequired {
				next: parts.uri.path().to_owned(),
			});
		}

		Ok(Self(session))
	}
}
