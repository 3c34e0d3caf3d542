use macros::model;
use serde::Serialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::Database;

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
	if slug
		.chars()
		.any(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_')))
	{
		let mut error = ValidationError::new("slug_charset");
		error.message = Some("Use only lowercase letters, digits, - and _.".into());
		return Err(error);
	}

	Ok(())
}

/// A topical group that posts may optionally belong to.
#[model]
#[derive(Debug, Clone, Serialize, Validate, sqlx::FromRow)]
pub struct Group {
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The display name of the group.
	#[serde(default)]
	#[validate(length(min = 1, max = 200, message = "Use between 1 and 200 characters."))]
	pub title: String,
	/// The unique, URL-safe identifier of the group.
	#[serde(default)]
	#[validate(
		length(min = 1, max = 64, message = "Use between 1 and 64 characters."),
		custom(function = "validate_slug")
	)]
	pub slug: String,
	#[serde(default)]
	pub description: String,
}

impl Group {
	pub async fn find_by_slug(database: &Database, slug: &str) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as::<_, Self>(r#"SELECT * FROM "group" WHERE slug = $1"#)
			.bind(slug)
			.fetch_optional(database)
			.await
	}

	pub async fn exists(database: &Database, id: Uuid) -> Result<bool, sqlx::Error> {
		sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM "group" WHERE id = $1)"#)
			.bind(id)
			.fetch_one(database)
			.await
	}

	/// Every group, by title. Used for the group selector on the post form.
	pub async fn all(database: &Database) -> Result<Vec<Self>, sqlx::Error> {
		sqlx::query_as::<_, Self>(r#"SELECT * FROM "group" ORDER BY title"#)
			.fetch_all(database)
			.await
	}

	/// Inserts a group. Returns `None` if the slug is already taken.
	pub async fn create(database: &Database, form: &GroupForm) -> Result<Option<Self>, sqlx::Error> {
		sqlx::query_as::<_, Self>(
			r#"
				INSERT INTO "group" (title, slug, description) VALUES ($1, $2, $3)
				ON CONFLICT (slug) DO NOTHING
				RETURNING *
			"#,
		)
		.bind(&form.title)
		.bind(&form.slug)
		.bind(&form.description)
		.fetch_optional(database)
		.await
	}

	pub fn url(&self) -> String {
		format!("/group/{}/", self.slug)
	}
}
