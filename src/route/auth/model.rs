use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::Database;

/// Usernames that would be shadowed by a top-level route.
pub const RESERVED_USERNAMES: [&str; 6] = ["admin", "auth", "follow", "group", "media", "new"];

fn validate_username(username: &str) -> Result<(), ValidationError> {
	if username
		.chars()
		.any(|c| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.')))
	{
		let mut error = ValidationError::new("username_charset");
		error.message = Some("Use only letters, digits and _ - . characters.".into());
		return Err(error);
	}

	if RESERVED_USERNAMES.contains(&username.to_lowercase().as_str()) {
		let mut error = ValidationError::new("username_reserved");
		error.message = Some("This username is reserved.".into());
		return Err(error);
	}

	Ok(())
}

/// A single user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
	/// The unique identifier of the user.
	pub id: Uuid,
	/// The hashed password.
	#[serde(skip)]
	pub password: Vec<u8>,
	/// The username that is displayed to the public.
	pub username: String,
	/// Whether the user may access the admin pages.
	pub is_staff: bool,
	/// The creation time of the user.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
	pub async fn find_by_username(
		database: &Database,
		username: &str,
	) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as::<_, Self>(r#"SELECT * FROM "user" WHERE username = $1"#)
			.bind(username)
			.fetch_optional(database)
			.await
	}
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginInput {
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub password: String,
	/// Where to go after logging in.
	#[serde(default)]
	pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SignupInput {
	#[serde(default)]
	#[validate(email(message = "Enter a valid email address."))]
	pub email: String,
	/// The username that is displayed to the public.
	#[serde(default)]
	#[validate(
		length(min = 3, max = 16, message = "Use between 3 and 16 characters."),
		custom(function = "validate_username")
	)]
	pub username: String,
	#[serde(default)]
	#[validate(length(min = 8, max = 128, message = "Use between 8 and 128 characters."))]
	pub password: String,
}

#[cfg(test)]
mod test {
	use validator::Validate;

	use super::SignupInput;

	fn input(username: &str) -> SignupInput {
		SignupInput {
			email: "john@smith.com".into(),
			username: username.into(),
			password: "hunter2hunter".into(),
		}
	}

	#[test]
	fn test_username_rules() {
		assert!(input("test_user").validate().is_ok());
		assert!(input("john.doe-1").validate().is_ok());
		assert!(input("jo").validate().is_err());
		assert!(input("john smith").validate().is_err());
		assert!(input("john/smith").validate().is_err());
	}

	#[test]
	fn test_reserved_usernames() {
		for name in super::RESERVED_USERNAMES {
			let errors = input(name).validate().unwrap_err();

			assert!(errors.field_errors().contains_key("username"), "{name}");
		}

		assert!(input("Admin").validate().is_err());
	}

	#[test]
	fn test_signup_requires_email_and_password() {
		let mut signup = input("john");
		signup.email = "nope".into();
		signup.password = "short".into();

		let errors = signup.validate().unwrap_err();
		let fields = errors.field_errors();

		assert!(fields.contains_key("email"));
		assert!(fields.contains_key("password"));
		assert!(!fields.contains_key("username"));
	}
}
