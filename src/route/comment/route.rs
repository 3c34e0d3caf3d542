use axum::{
	body::Body,
	extract::State,
	http::{Response, StatusCode},
	response::IntoResponse,
};
use validator::Validate;

use crate::{
	extract::{Form, Path, Session},
	page::{self, FormErrors},
	route::post::{
		self,
		model::{Post, PostPath},
	},
	Database,
};

use super::model::{Comment, CommentForm};

/// Add comment
/// Comments on a post as the logged-in user. A blank comment re-renders the post with the error.
pub async fn add_comment(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<PostPath>,
	Form(form): Form<CommentForm>,
) -> Result<Response<Body>, crate::Error> {
	let post = Post::find(&database, &path.username, path.post_id)
		.await?
		.ok_or(post::Error::UnknownPost(path.post_id))?;

	if let Err(errors) = form.validate() {
		let comments = Comment::for_post(&database, post.id).await?;
		let errors = FormErrors::from(errors);

		return Ok((
			StatusCode::OK,
			page::layout(
				&format!("Post by {}", post.author_username),
				Some(&session.user),
				post::view::detail(&post, &comments, Some(&session.user), &form.text, &errors),
			),
		)
			.into_response());
	}

	let comment_id = Comment::create(&database, post.id, session.user.id, &form).await?;

	tracing::info!(comment = %comment_id, post = %post.id, "comment added");

	Ok(page::redirect(&post.url()))
}
