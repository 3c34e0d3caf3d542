use axum::{body::Body, extract::State, http::Response};
use maud::Markup;

use crate::{
	extract::{Path, Query, Session},
	page,
	route::{
		auth::model::User,
		post::{
			model::{PageQuery, Post, PostFilter},
			view as post_view,
		},
	},
	Database,
};

use super::{
	model::{Follow, ProfileStats},
	view,
};

async fn find_author(database: &Database, username: &str) -> Result<User, crate::Error> {
	User::find_by_username(database, username)
		.await?
		.ok_or(crate::Error::NotFound("user"))
}

/// Profile
/// Shows a user's posts, their counters and a follow button.
pub async fn profile(
	State(database): State<Database>,
	session: Session,
	Path(username): Path<String>,
	Query(query): Query<PageQuery>,
) -> Result<Markup, crate::Error> {
	let author = find_author(&database, &username).await?;

	let filter = PostFilter {
		author_id: Some(author.id),
		..PostFilter::default()
	};
	let posts = Post::page(&database, &filter, &query).await?;
	let stats = ProfileStats::for_user(&database, author.id).await?;

	let following = if author.id == session.user.id {
		None
	} else {
		Some(Follow::exists(&database, session.user.id, author.id).await?)
	};

	Ok(view::profile(&author, &session.user, stats, following, &posts))
}

/// Following feed
/// Posts by the authors the logged-in user follows.
pub async fn follow_index(
	State(database): State<Database>,
	session: Session,
	Query(query): Query<PageQuery>,
) -> Result<Markup, crate::Error> {
	let filter = PostFilter {
		followed_by: Some(session.user.id),
		..PostFilter::default()
	};
	let posts = Post::page(&database, &filter, &query).await?;

	Ok(page::layout(
		"Following",
		Some(&session.user),
		post_view::listing(&posts, Some(&session.user)),
	))
}

/// Follow
/// Following yourself or someone you already follow changes nothing.
pub async fn profile_follow(
	State(database): State<Database>,
	session: Session,
	Path(username): Path<String>,
) -> Result<Response<Body>, crate::Error> {
	let author = find_author(&database, &username).await?;

	if author.id != session.user.id && Follow::create(&database, session.user.id, author.id).await? {
		tracing::info!(user = %session.user.username, author = %author.username, "followed");
	}

	Ok(page::redirect(&format!("/{}/", author.username)))
}

/// Unfollow
pub async fn profile_unfollow(
	State(database): State<Database>,
	session: Session,
	Path(username): Path<String>,
) -> Result<Response<Body>, crate::Error> {
	let author = find_author(&database, &username).await?;

	if !Follow::delete(&database, session.user.id, author.id).await? {
		return Err(crate::Error::NotFound("follow"));
	}

	tracing::info!(user = %session.user.username, author = %author.username, "unfollowed");

	Ok(page::redirect(&format!("/{}/", author.username)))
}
