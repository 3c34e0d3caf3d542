use maud::{html, Markup};
use uuid::Uuid;

use crate::{
	media,
	page::{self, FormErrors},
	route::{auth::model::User, comment::model::Comment, group::model::Group},
};

use super::model::{Page, Post, PostForm};

/// A post as it appears in every listing. The edit link is only shown to the author.
pub fn card(post: &Post, viewer: Option<&User>) -> Markup {
	html! {
		article.post {
			header {
				a href={ "/" (post.author_username) "/" } { (post.author_username) }
				" · "
				time datetime=(post.pub_date.to_rfc3339()) {
					(post.pub_date.format("%d %b %Y %H:%M").to_string())
				}
				@if let (Some(slug), Some(title)) = (&post.group_slug, &post.group_title) {
					" · "
					a href={ "/group/" (slug) "/" } { (title) }
				}
			}
			@if let Some(image) = &post.image {
				img src=(media::url(image)) alt="Post image";
			}
			p.text { (post.text) }
			footer {
				a href=(post.url()) {
					"Comments (" (post.comment_count) ")"
				}
				@if viewer.is_some_and(|viewer| viewer.id == post.author_id) {
					" · "
					a href=(post.edit_url()) { "Edit" }
				}
			}
		}
	}
}

/// A page of posts followed by the paginator.
pub fn listing(page: &Page<Post>, viewer: Option<&User>) -> Markup {
	html! {
		@if page.items.is_empty() {
			p.empty { "No posts yet." }
		}
		@for post in &page.items {
			(card(post, viewer))
		}
		(page::paginator(page, ""))
	}
}

/// The post itself, its comments and the comment form.
pub fn detail(
	post: &Post,
	comments: &[Comment],
	viewer: Option<&User>,
	comment_text: &str,
	errors: &FormErrors,
) -> Markup {
	html! {
		(card(post, viewer))
		section.comments {
			h2 { "Comments" }
			@if viewer.is_some() {
				form method="post" action={ (post.url()) "comment/" } {
					textarea name="text" rows="3" required { (comment_text) }
					(errors.field("text"))
					button type="submit" { "Comment" }
				}
			}
			@for comment in comments {
				article.comment {
					header {
						a href={ "/" (comment.author_username) "/" } { (comment.author_username) }
						" · "
						time datetime=(comment.created.to_rfc3339()) {
							(comment.created.format("%d %b %Y %H:%M").to_string())
						}
					}
					p { (comment.text) }
				}
			}
		}
	}
}

/// The form for creating a post, or editing `editing` when given.
pub fn form(
	viewer: &User,
	groups: &[Group],
	input: &PostForm,
	errors: &FormErrors,
	editing: Option<&Post>,
) -> Markup {
	let (title, action) = match editing {
		Some(post) => ("Edit post", post.edit_url()),
		None => ("New post", "/new/".to_owned()),
	};
	let selected = |id: Uuid| input.group_id == Some(id);

	page::layout(
		title,
		Some(viewer),
		html! {
			form method="post" action=(action) enctype="multipart/form-data" {
				p {
					label for="text" { "Text" }
					textarea id="text" name="text" rows="8" required { (input.text) }
					(errors.field("text"))
				}
				p {
					label for="group" { "Group" }
					select id="group" name="group" {
						option value="" { "---------" }
						@for group in groups {
							option value=(group.id.to_string()) selected[selected(group.id)] { (group.title) }
						}
					}
					(errors.field("group_id"))
				}
				p {
					label for="image" { "Image" }
					input id="image" type="file" name="image" accept="image/*";
					@if let Some(image) = editing.and_then(|post| post.image.as_deref()) {
						span.current-image { "Currently: " (image) }
					}
				}
				button type="submit" { (if editing.is_some() { "Save" } else { "Publish" }) }
			}
		},
	)
}

#[cfg(test)]
mod test {
	use chrono::Utc;
	use uuid::Uuid;

	use super::*;

	fn post(image: Option<&str>) -> Post {
		Post {
			id: Uuid::new_v4(),
			text: "test <b>test</b> test".into(),
			pub_date: Utc::now(),
			author_id: Uuid::new_v4(),
			author_username: "test_user".into(),
			group_id: None,
			group_slug: None,
			group_title: None,
			image: image.map(str::to_owned),
			comment_count: 2,
		}
	}

	#[test]
	fn test_card_renders_image_only_when_present() {
		assert!(!card(&post(None), None).into_string().contains("<img"));
		assert!(card(&post(Some("posts/a.png")), None)
			.into_string()
			.contains(r#"<img src="/media/posts/a.png""#));
	}

	#[test]
	fn test_card_escapes_text() {
		let markup = card(&post(None), None).into_string();

		assert!(markup.contains("test &lt;b&gt;test&lt;/b&gt; test"));
		assert!(markup.contains("Comments (2)"));
	}
}
