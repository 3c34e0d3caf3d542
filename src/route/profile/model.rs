use uuid::Uuid;

use crate::{
	route::model::{Page, PageQuery, Paginate},
	Database,
};

/// A directed edge: `user` sees the posts of `author` on their following feed.
///
/// Rows only carry the usernames shown in listings. Edges are addressed by
/// the two user ids.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Follow {
	pub user_username: String,
	pub author_username: String,
}

impl Follow {
	/// Inserts the edge. Returns `false` if it already existed.
	pub async fn create(database: &Database, user_id: Uuid, author_id: Uuid) -> Result<bool, sqlx::Error> {
		let result = sqlx::query(
			r#"
				INSERT INTO follow (user_id, author_id) VALUES ($1, $2)
				ON CONFLICT (user_id, author_id) DO NOTHING
			"#,
		)
		.bind(user_id)
		.bind(author_id)
		.execute(database)
		.await?;

		Ok(result.rows_affected() > 0)
	}

	/// Deletes the edge. Returns `false` if there was none.
	pub async fn delete(database: &Database, user_id: Uuid, author_id: Uuid) -> Result<bool, sqlx::Error> {
		let result = sqlx::query("DELETE FROM follow WHERE user_id = $1 AND author_id = $2")
			.bind(user_id)
			.bind(author_id)
			.execute(database)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	pub async fn exists(database: &Database, user_id: Uuid, author_id: Uuid) -> Result<bool, sqlx::Error> {
		sqlx::query_scalar(
			"SELECT EXISTS (SELECT 1 FROM follow WHERE user_id = $1 AND author_id = $2)",
		)
		.bind(user_id)
		.bind(author_id)
		.fetch_one(database)
		.await
	}

	/// Every edge, newest first.
	pub async fn page(database: &Database, query: &PageQuery) -> Result<Page<Self>, sqlx::Error> {
		let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follow")
			.fetch_one(database)
			.await?;

		let paginate = Paginate::clamp(query, total);

		let follows = sqlx::query_as::<_, Self>(
			r#"
				SELECT
					follower.username AS user_username,
					author.username AS author_username
				FROM follow
				JOIN "user" follower ON follower.id = follow.user_id
				JOIN "user" author ON author.id = follow.author_id
				ORDER BY follow.created_at DESC
				LIMIT $1 OFFSET $2
			"#,
		)
		.bind(paginate.limit())
		.bind(paginate.offset())
		.fetch_all(database)
		.await?;

		Ok(Page::from_window(follows, paginate, total))
	}
}

/// The counters shown on a profile page.
#[derive(Debug, Default, Clone, Copy, sqlx::FromRow)]
pub struct ProfileStats {
	pub posts: i64,
	pub followers: i64,
	pub following: i64,
}

impl ProfileStats {
	pub async fn for_user(database: &Database, user_id: Uuid) -> Result<Self, sqlx::Error> {
		sqlx::query_as::<_, Self>(
			r#"
				SELECT
					(SELECT COUNT(*) FROM post WHERE author_id = $1) AS posts,
					(SELECT COUNT(*) FROM follow WHERE author_id = $1) AS followers,
					(SELECT COUNT(*) FROM follow WHERE user_id = $1) AS following
			"#,
		)
		.bind(user_id)
		.fetch_one(database)
		.await
	}
}
