use axum::extract::State;
use maud::{html, Markup};

use crate::{
	extract::{Path, Query, Session},
	page,
	route::post::{
		model::{PageQuery, Post, PostFilter},
		view,
	},
	Database,
};

use super::model::Group;

/// Group feed
/// Lists the posts of one group, newest first.
pub async fn group_posts(
	State(database): State<Database>,
	session: Session,
	Path(slug): Path<String>,
	Query(query): Query<PageQuery>,
) -> Result<Markup, crate::Error> {
	let group = Group::find_by_slug(&database, &slug)
		.await?
		.ok_or(crate::Error::NotFound("group"))?;

	let filter = PostFilter {
		group_id: Some(group.id),
		..PostFilter::default()
	};
	let posts = Post::page(&database, &filter, &query).await?;

	Ok(page::layout(
		&group.title,
		Some(&session.user),
		html! {
			@if !group.description.is_empty() {
				p.description { (group.description) }
			}
			(view::listing(&posts, Some(&session.user)))
		},
	))
}
