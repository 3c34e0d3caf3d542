use chrono::{DateTime, Utc};
use macros::model;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
	route::{
		model::{Page, PageQuery, Paginate},
		post::model::{escape_like, not_blank},
	},
	Database,
};

/// A comment on a post, joined with its author.
#[model]
#[derive(Debug, Clone, Serialize, Validate, sqlx::FromRow)]
pub struct Comment {
	#[serde(skip_deserializing)]
	pub id: Uuid,
	#[serde(skip_deserializing)]
	pub post_id: Uuid,
	/// The author of the commented post, needed to link back to it.
	#[serde(skip_deserializing)]
	pub post_author_username: String,
	#[serde(skip_deserializing)]
	pub author_id: Uuid,
	#[serde(skip_deserializing)]
	pub author_username: String,
	/// The body of the comment.
	#[serde(default)]
	#[validate(custom(function = "not_blank"))]
	pub text: String,
	#[serde(skip_deserializing)]
	pub created: DateTime<Utc>,
}

/// Which comments an admin listing contains.
#[derive(Debug, Default, Clone)]
pub struct CommentFilter {
	pub search: Option<String>,
	pub since: Option<DateTime<Utc>>,
}

const SELECT: &str = r#"
	SELECT
		comment.id,
		comment.post_id,
		post_author.username AS post_author_username,
		comment.author_id,
		"user".username AS author_username,
		comment.text,
		comment.created
	FROM comment
	JOIN "user" ON "user".id = comment.author_id
	JOIN post ON post.id = comment.post_id
	JOIN "user" post_author ON post_author.id = post.author_id
"#;

const FILTER: &str = r#"
	WHERE ($1::text IS NULL OR comment.text ILIKE '%' || $1 || '%')
	AND ($2::timestamptz IS NULL OR comment.created >= $2)
"#;

impl Comment {
	/// Every comment on a post, newest first.
	pub async fn for_post(database: &Database, post_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
		let select = format!("{SELECT} WHERE comment.post_id = $1 ORDER BY comment.created DESC");

		sqlx::query_as::<_, Self>(&select)
			.bind(post_id)
			.fetch_all(database)
			.await
	}

	pub async fn create(
		database: &Database,
		post_id: Uuid,
		author_id: Uuid,
		form: &CommentForm,
	) -> Result<Uuid, sqlx::Error> {
		sqlx::query_scalar(
			"INSERT INTO comment (post_id, author_id, text) VALUES ($1, $2, $3) RETURNING id",
		)
		.bind(post_id)
		.bind(author_id)
		.bind(&form.text)
		.fetch_one(database)
		.await
	}

	/// A page of all comments matching `filter`, newest first.
	pub async fn page(
		database: &Database,
		filter: &CommentFilter,
		query: &PageQuery,
	) -> Result<Page<Self>, sqlx::Error> {
		let search = filter.search.as_deref().map(escape_like);

		let count = format!("SELECT COUNT(*) FROM comment {FILTER}");
		let total: i64 = sqlx::query_scalar(&count)
			.bind(&search)
			.bind(filter.since)
			.fetch_one(database)
			.await?;

		let paginate = Paginate::clamp(query, total);

		let select = format!("{SELECT} {FILTER} ORDER BY comment.created DESC LIMIT $3 OFFSET $4");
		let comments = sqlx::query_as::<_, Self>(&select)
			.bind(&search)
			.bind(filter.since)
			.bind(paginate.limit())
			.bind(paginate.offset())
			.fetch_all(database)
			.await?;

		Ok(Page::from_window(comments, paginate, total))
	}

	pub fn post_url(&self) -> String {
		format!("/{}/{}/", self.post_author_username, self.post_id)
	}
}
