use argon2::Argon2;
use axum::{
	body::Body,
	extract::State,
	http::{header, Response},
	response::IntoResponse,
};
use maud::Markup;
use uuid::Uuid;
use validator::Validate;

use crate::{
	extract::{Form, MaybeSession, Query},
	page::{self, FormErrors},
	session, AppState, Database,
};

use super::{model, view, Error};

pub const KEY_LENGTH: usize = 32;

/// Hashes a password with Argon2, using the user's id as a salt.
/// Since this is only used for logging in and creating a new password,
/// the scope of this function can remain in here with no issues.
fn hash_password(
	hasher: &Argon2,
	password: &str,
	id: &Uuid,
) -> Result<[u8; KEY_LENGTH], argon2::Error> {
	let mut hash = [0; KEY_LENGTH];

	hasher.hash_password_into(password.as_bytes(), id.as_bytes(), &mut hash)?;
	Ok(hash)
}

/// Redirects to `location` while setting a fresh session cookie.
fn start_session(session_id: Uuid, location: &str) -> Response<Body> {
	let cookie = session::create_cookie(session_id);

	(
		[(header::SET_COOKIE, cookie.to_string())],
		page::redirect(location),
	)
		.into_response()
}

pub async fn login_form(Query(input): Query<model::LoginInput>) -> Markup {
	view::login(&input, &FormErrors::default())
}

/// Logs in to an account, setting the session cookie and returning to `next`.
pub async fn login(
	State(state): State<AppState>,
	Form(input): Form<model::LoginInput>,
) -> Result<Response<Body>, crate::Error> {
	let user = model::User::find_by_username(&state.database, &input.username).await?;

	// unknown usernames are hashed too, so both failures take as long
	let salt = user.as_ref().map_or(Uuid::nil(), |user| user.id);
	let hashed = hash_password(&state.hasher, &input.password, &salt).map_err(Error::Argon)?;
	let verified = user.filter(|user| user.password == hashed);

	let Some(user) = verified else {
		let mut errors = FormErrors::default();
		errors.add(
			Error::InvalidUsernameOrPassword.field(),
			Error::InvalidUsernameOrPassword.to_string(),
		);

		return Ok(view::login(&input, &errors).into_response());
	};

	let session_id: Uuid =
		sqlx::query_scalar("INSERT INTO session (user_id) VALUES ($1) RETURNING id")
			.bind(user.id)
			.fetch_one(&state.database)
			.await?;

	tracing::info!(user = %user.username, "logged in");

	Ok(start_session(session_id, session::safe_next(input.next.as_deref())))
}

/// Logs out of the current session, if there is one.
pub async fn logout(
	State(database): State<Database>,
	session: MaybeSession,
) -> Result<impl IntoResponse, crate::Error> {
	if let Some(session) = session.0 {
		sqlx::query("DELETE FROM session WHERE id = $1")
			.bind(session.id)
			.execute(&database)
			.await?;
	}

	// Clear the session cookie
	Ok((
		[(header::SET_COOKIE, session::clear_cookie().to_string())],
		page::redirect("/"),
	))
}

pub async fn signup_form() -> Markup {
	view::signup(&model::SignupInput::default(), &FormErrors::default())
}

/// Registers a new account, logging it in straight away.
pub async fn signup(
	State(state): State<AppState>,
	Form(input): Form<model::SignupInput>,
) -> Result<Response<Body>, crate::Error> {
	if let Err(errors) = input.validate() {
		return Ok(view::signup(&input, &errors.into()).into_response());
	}

	let user_id = Uuid::new_v4();
	let hashed = hash_password(&state.hasher, &input.password, &user_id).map_err(Error::Argon)?;

	let mut tx = state.database.begin().await?;

	let inserted = sqlx::query(
		r#"
			INSERT INTO "user" (id, email, username, password) VALUES ($1, $2, $3, $4)
		"#,
	)
	.bind(user_id)
	.bind(&input.email)
	.bind(&input.username)
	.bind(&hashed[..])
	.execute(&mut *tx)
	.await;

	if let Err(e) = inserted {
		let taken = match e {
			sqlx::Error::Database(ref d) => match d.constraint() {
				Some("user_email_key") => Error::EmailTaken,
				Some("user_username_key") => Error::UsernameTaken,
				_ => return Err(e.into()),
			},
			e => return Err(e.into()),
		};

		let mut errors = FormErrors::default();
		errors.add(taken.field(), taken.to_string());

		return Ok(view::signup(&input, &errors).into_response());
	}

	let session_id: Uuid =
		sqlx::query_scalar("INSERT INTO session (user_id) VALUES ($1) RETURNING id")
			.bind(user_id)
			.fetch_one(&mut *tx)
			.await?;

	tx.commit().await?;

	tracing::info!(user = %input.username, "registered");

	Ok(start_session(session_id, "/"))
}
