use axum::{body::Body, extract::State, http::Response, response::IntoResponse};
use chrono::Utc;
use maud::Markup;
use validator::Validate;

use crate::{
	cache::PageCache,
	extract::{Form, Query, Staff},
	page::{self, FormErrors},
	route::{
		comment::model::{Comment, CommentFilter},
		group::model::{Group, GroupForm},
		model::PageQuery,
		post::model::{Post, PostFilter},
		profile::model::Follow,
	},
	Database,
};

use super::{
	model::AdminQuery,
	view::{self, Counts},
};

pub async fn index(
	State(database): State<Database>,
	Staff(session): Staff,
) -> Result<Markup, crate::Error> {
	let counts = sqlx::query_as::<_, Counts>(
		r#"
			SELECT
				(SELECT COUNT(*) FROM "user") AS users,
				(SELECT COUNT(*) FROM "group") AS groups,
				(SELECT COUNT(*) FROM post) AS posts,
				(SELECT COUNT(*) FROM comment) AS comments,
				(SELECT COUNT(*) FROM follow) AS follows
		"#,
	)
	.fetch_one(&database)
	.await?;

	Ok(view::index(&session.user, counts))
}

/// Posts searchable by text and filterable by publish date.
pub async fn posts(
	State(database): State<Database>,
	Staff(session): Staff,
	Query(query): Query<AdminQuery>,
) -> Result<Markup, crate::Error> {
	let filter = PostFilter {
		search: query.search(),
		since: query.date_filter().map(|since| since.cutoff(Utc::now())),
		..PostFilter::default()
	};
	let posts = Post::page(&database, &filter, &query.page_query()).await?;

	Ok(view::posts(&session.user, &posts, &query))
}

/// Comments searchable by text and filterable by creation date.
pub async fn comments(
	State(database): State<Database>,
	Staff(session): Staff,
	Query(query): Query<AdminQuery>,
) -> Result<Markup, crate::Error> {
	let filter = CommentFilter {
		search: query.search(),
		since: query.date_filter().map(|since| since.cutoff(Utc::now())),
	};
	let comments = Comment::page(&database, &filter, &query.page_query()).await?;

	Ok(view::comments(&session.user, &comments, &query))
}

pub async fn follows(
	State(database): State<Database>,
	Staff(session): Staff,
	Query(query): Query<PageQuery>,
) -> Result<Markup, crate::Error> {
	let follows = Follow::page(&database, &query).await?;

	Ok(view::follows(&session.user, &follows))
}

pub async fn groups(
	State(database): State<Database>,
	Staff(session): Staff,
) -> Result<Markup, crate::Error> {
	let groups = Group::all(&database).await?;

	Ok(view::groups(&session.user, &groups, &GroupForm::default(), &FormErrors::default()))
}

/// Creates a group. Groups have no other creation path.
pub async fn create_group(
	State(database): State<Database>,
	Staff(session): Staff,
	Form(form): Form<GroupForm>,
) -> Result<Response<Body>, crate::Error> {
	let mut errors = form.validate().err().map(FormErrors::from).unwrap_or_default();

	if errors.is_empty() {
		match Group::create(&database, &form).await? {
			Some(group) => {
				tracing::info!(group = %group.slug, "group created");

				return Ok(page::redirect("/admin/groups/"));
			}
			None => errors.add("slug", "A group with this slug already exists."),
		}
	}

	let groups = Group::all(&database).await?;

	Ok(view::groups(&session.user, &groups, &form, &errors).into_response())
}

/// Drops every cached feed page.
pub async fn clear_cache(State(cache): State<PageCache>, Staff(_): Staff) -> Response<Body> {
	cache.clear();

	page::redirect("/admin/")
}
