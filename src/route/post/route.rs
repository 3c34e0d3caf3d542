use std::sync::Arc;

use axum::{
	body::Body,
	extract::{Multipart, State},
	http::{Response, Uri},
	response::IntoResponse,
};
use maud::{Markup, PreEscaped};
use validator::Validate;

use crate::{
	extract::{MaybeSession, Path, Query, Session},
	media::Upload,
	page::{self, FormErrors},
	route::{comment::model::Comment, group::model::Group},
	AppState, Database,
};

use super::{model, view, Error};

/// Validates a submitted post, including that the chosen group exists.
async fn validate(database: &Database, form: &model::PostForm) -> Result<FormErrors, crate::Error> {
	let mut errors = form.validate().err().map(FormErrors::from).unwrap_or_default();

	if let Some(group_id) = form.group_id {
		if !Group::exists(database, group_id).await? {
			errors.add("group_id", "Select a valid choice.");
		}
	}

	Ok(errors)
}

/// Stores the upload, if any. Invalid images are dropped without failing the request.
async fn store_image(state: &AppState, upload: Option<Upload>) -> Result<Option<String>, crate::Error> {
	match upload {
		Some(upload) => Ok(state.media.save_image(upload).await?),
		None => Ok(None),
	}
}

/// Global feed
/// The listing is cached by URL; new posts show up once the entry expires or the cache is cleared.
pub async fn index(
	State(state): State<AppState>,
	session: MaybeSession,
	uri: Uri,
	Query(query): Query<model::PageQuery>,
) -> Result<Markup, crate::Error> {
	let key = uri.to_string();

	let listing = match state.cache.get(&key).await {
		Some(listing) => listing,
		None => {
			let page = model::Post::page(&state.database, &model::PostFilter::default(), &query).await?;
			let listing: Arc<str> = view::listing(&page, None).into_string().into();

			state.cache.insert(key, listing.clone()).await;
			listing
		}
	};

	Ok(page::layout(
		"Latest posts",
		session.user(),
		PreEscaped(listing.to_string()),
	))
}

pub async fn new_post_form(
	State(database): State<Database>,
	session: Session,
) -> Result<Markup, crate::Error> {
	let groups = Group::all(&database).await?;

	Ok(view::form(
		&session.user,
		&groups,
		&model::PostForm::default(),
		&FormErrors::default(),
		None,
	))
}

/// Create post
/// Publishes a new post by the logged-in user and returns to the feed.
pub async fn create_post(
	State(state): State<AppState>,
	session: Session,
	multipart: Multipart,
) -> Result<Response<Body>, crate::Error> {
	let (form, upload) = model::PostForm::from_multipart(multipart).await?;
	let errors = validate(&state.database, &form).await?;

	if !errors.is_empty() {
		let groups = Group::all(&state.database).await?;

		return Ok(view::form(&session.user, &groups, &form, &errors, None).into_response());
	}

	let image = store_image(&state, upload).await?;
	let created = model::Post::create(&state.database, session.user.id, &form, image.as_deref()).await;

	let post_id = match created {
		Ok(post_id) => post_id,
		Err(error) => {
			if let Some(image) = &image {
				state.media.remove(image).await?;
			}

			return Err(error.into());
		}
	};

	tracing::info!(post = %post_id, author = %session.user.username, "post created");

	Ok(page::redirect("/"))
}

/// Single post
/// Shows a post with its comments.
pub async fn post_view(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::PostPath>,
) -> Result<Markup, crate::Error> {
	let post = model::Post::find(&database, &path.username, path.post_id)
		.await?
		.ok_or(Error::UnknownPost(path.post_id))?;
	let comments = Comment::for_post(&database, post.id).await?;

	Ok(page::layout(
		&format!("Post by {}", post.author_username),
		Some(&session.user),
		view::detail(&post, &comments, Some(&session.user), "", &FormErrors::default()),
	))
}

pub async fn edit_post_form(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::PostPath>,
) -> Result<Response<Body>, crate::Error> {
	let post = model::Post::find(&database, &path.username, path.post_id)
		.await?
		.ok_or(Error::UnknownPost(path.post_id))?;

	if post.author_id != session.user.id {
		return Ok(page::redirect(&post.url()));
	}

	let groups = Group::all(&database).await?;
	let form = model::PostForm::from_post(&post);

	Ok(view::form(&session.user, &groups, &form, &FormErrors::default(), Some(&post)).into_response())
}

/// Update post
/// Applies an edit by the post's author. Anyone else is sent back to the post.
pub async fn edit_post(
	State(state): State<AppState>,
	session: Session,
	Path(path): Path<model::PostPath>,
	multipart: Multipart,
) -> Result<Response<Body>, crate::Error> {
	let post = model::Post::find(&state.database, &path.username, path.post_id)
		.await?
		.ok_or(Error::UnknownPost(path.post_id))?;

	if post.author_id != session.user.id {
		tracing::debug!(post = %post.id, user = %session.user.username, "edit by non-author refused");

		return Ok(page::redirect(&post.url()));
	}

	let (form, upload) = model::PostForm::from_multipart(multipart).await?;
	let errors = validate(&state.database, &form).await?;

	if !errors.is_empty() {
		let groups = Group::all(&state.database).await?;

		return Ok(view::form(&session.user, &groups, &form, &errors, Some(&post)).into_response());
	}

	let image = store_image(&state, upload).await?;

	if let Err(error) = model::Post::update(&state.database, post.id, &form, image.as_deref()).await {
		if let Some(image) = &image {
			state.media.remove(image).await?;
		}

		return Err(error.into());
	}

	// the replaced image is no longer referenced
	if let (Some(_), Some(old)) = (&image, &post.image) {
		state.media.remove(old).await?;
	}

	tracing::info!(post = %post.id, "post updated");

	Ok(page::redirect(&post.url()))
}
