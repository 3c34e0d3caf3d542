pub use crate::route::model::{Page, PageQuery, Paginate};

use axum::extract::{multipart::MultipartError, Multipart};
use chrono::{DateTime, Utc};
use macros::model;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{media::Upload, Database};

/// Rejects empty and whitespace-only text.
pub fn not_blank(text: &str) -> Result<(), ValidationError> {
	if text.trim().is_empty() {
		let mut error = ValidationError::new("required");
		error.message = Some("This field is required.".into());
		return Err(error);
	}

	Ok(())
}

/// A single post, joined with its author, group and comment count.
#[model]
#[derive(Debug, Clone, Serialize, Validate, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The body of the post.
	#[serde(default)]
	#[validate(custom(function = "not_blank"))]
	pub text: String,
	/// Set once when the post is created.
	#[serde(skip_deserializing)]
	pub pub_date: DateTime<Utc>,
	#[serde(skip_deserializing)]
	pub author_id: Uuid,
	#[serde(skip_deserializing)]
	pub author_username: String,
	/// The group the post belongs to, if any.
	#[serde(default)]
	pub group_id: Option<Uuid>,
	#[serde(skip_deserializing)]
	pub group_slug: Option<String>,
	#[serde(skip_deserializing)]
	pub group_title: Option<String>,
	/// Path of the attached image, relative to the media root.
	#[serde(skip_deserializing)]
	pub image: Option<String>,
	#[serde(skip_deserializing)]
	pub comment_count: i64,
}

/// Path parameters of the routes below `/<username>/<post_id>/`.
#[derive(Debug, Deserialize)]
pub struct PostPath {
	pub username: String,
	pub post_id: Uuid,
}

/// Which posts a listing contains. Unset fields do not filter.
#[derive(Debug, Default, Clone)]
pub struct PostFilter {
	pub group_id: Option<Uuid>,
	pub author_id: Option<Uuid>,
	/// Only posts by authors this user follows.
	pub followed_by: Option<Uuid>,
	/// Case-insensitive substring of the text.
	pub search: Option<String>,
	/// Only posts published at or after this time.
	pub since: Option<DateTime<Utc>>,
}

const SELECT: &str = r#"
	SELECT
		post.id,
		post.text,
		post.pub_date,
		post.author_id,
		"user".username AS author_username,
		post.group_id,
		"group".slug AS group_slug,
		"group".title AS group_title,
		post.image,
		(SELECT COUNT(*) FROM comment WHERE comment.post_id = post.id) AS comment_count
	FROM post
	JOIN "user" ON "user".id = post.author_id
	LEFT JOIN "group" ON "group".id = post.group_id
"#;

const FILTER: &str = r#"
	WHERE ($1::uuid IS NULL OR post.group_id = $1)
	AND ($2::uuid IS NULL OR post.author_id = $2)
	AND ($3::uuid IS NULL OR post.author_id IN (SELECT author_id FROM follow WHERE user_id = $3))
	AND ($4::text IS NULL OR post.text ILIKE '%' || $4 || '%')
	AND ($5::timestamptz IS NULL OR post.pub_date >= $5)
"#;

/// Escapes `LIKE` wildcards so user input only matches literally.
pub fn escape_like(input: &str) -> String {
	input
		.replace('\\', "\\\\")
		.replace('%', "\\%")
		.replace('_', "\\_")
}

impl Post {
	/// Fetches one page of posts matching `filter`, newest first.
	pub async fn page(
		database: &Database,
		filter: &PostFilter,
		query: &PageQuery,
	) -> Result<Page<Self>, sqlx::Error> {
		let search = filter.search.as_deref().map(escape_like);

		let count = format!("SELECT COUNT(*) FROM post {FILTER}");
		let total: i64 = sqlx::query_scalar(&count)
			.bind(filter.group_id)
			.bind(filter.author_id)
			.bind(filter.followed_by)
			.bind(&search)
			.bind(filter.since)
			.fetch_one(database)
			.await?;

		let paginate = Paginate::clamp(query, total);

		let select = format!("{SELECT} {FILTER} ORDER BY post.pub_date DESC LIMIT $6 OFFSET $7");
		let posts = sqlx::query_as::<_, Self>(&select)
			.bind(filter.group_id)
			.bind(filter.author_id)
			.bind(filter.followed_by)
			.bind(&search)
			.bind(filter.since)
			.bind(paginate.limit())
			.bind(paginate.offset())
			.fetch_all(database)
			.await?;

		Ok(Page::from_window(posts, paginate, total))
	}

	/// Finds a post by id, provided it was written by `username`.
	pub async fn find(
		database: &Database,
		username: &str,
		post_id: Uuid,
	) -> Result<Option<Self>, sqlx::Error> {
		let select = format!(r#"{SELECT} WHERE post.id = $1 AND "user".username = $2"#);

		sqlx::query_as::<_, Self>(&select)
			.bind(post_id)
			.bind(username)
			.fetch_optional(database)
			.await
	}

	pub async fn create(
		database: &Database,
		author_id: Uuid,
		form: &PostForm,
		image: Option<&str>,
	) -> Result<Uuid, sqlx::Error> {
		sqlx::query_scalar(
			r#"
				INSERT INTO post (text, author_id, group_id, image)
				VALUES ($1, $2, $3, $4)
				RETURNING id
			"#,
		)
		.bind(&form.text)
		.bind(author_id)
		.bind(form.group_id)
		.bind(image)
		.fetch_one(database)
		.await
	}

	/// Replaces text and group. The image is only replaced when a new one is given,
	/// and the publish date never changes.
	pub async fn update(
		database: &Database,
		post_id: Uuid,
		form: &PostForm,
		image: Option<&str>,
	) -> Result<(), sqlx::Error> {
		sqlx::query(
			r#"
				UPDATE post
				SET text = $1, group_id = $2, image = COALESCE($3, image)
				WHERE id = $4
			"#,
		)
		.bind(&form.text)
		.bind(form.group_id)
		.bind(image)
		.bind(post_id)
		.execute(database)
		.await?;

		Ok(())
	}

	pub fn url(&self) -> String {
		format!("/{}/{}/", self.author_username, self.id)
	}

	pub fn edit_url(&self) -> String {
		format!("/{}/{}/edit/", self.author_username, self.id)
	}
}

impl PostForm {
	/// Prefills the edit form.
	pub fn from_post(post: &Post) -> Self {
		Self {
			text: post.text.clone(),
			group_id: post.group_id,
		}
	}

	/// Reads the `text`, `group` and `image` fields of a multipart body.
	///
	/// An empty file input is treated as no upload.
	pub async fn from_multipart(
		mut multipart: Multipart,
	) -> Result<(Self, Option<Upload>), MultipartError> {
		let mut form = Self::default();
		let mut upload = None;

		while let Some(field) = multipart.next_field().await? {
			let name = field.name().map(str::to_owned);

			match name.as_deref() {
				Some("text") => form.text = field.text().await?,
				Some("group") => {
					let value = field.text().await?;
					let value = value.trim();

					// unparseable ids fail the group existence check
					form.group_id =
						(!value.is_empty()).then(|| value.parse().unwrap_or_else(|_| Uuid::nil()));
				}
				Some("image") => {
					let file_name = field.file_name().map(str::to_owned);
					let bytes = field.bytes().await?;

					if !bytes.is_empty() {
						upload = Some(Upload { file_name, bytes });
					}
				}
				_ => {}
			}
		}

		Ok((form, upload))
	}
}
