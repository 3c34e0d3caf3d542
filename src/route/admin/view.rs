use maud::{html, Markup};

use crate::{
	page::{self, FormErrors, EMPTY_VALUE},
	route::{
		auth::model::User,
		comment::model::Comment,
		group::model::{Group, GroupForm},
		model::Page,
		post::model::Post,
		profile::model::Follow,
	},
};

use super::model::{AdminQuery, DateFilter};

/// Row counts shown on the admin index.
#[derive(Debug, Default, Clone, Copy, sqlx::FromRow)]
pub struct Counts {
	pub users: i64,
	pub groups: i64,
	pub posts: i64,
	pub comments: i64,
	pub follows: i64,
}

const TIMESTAMP: &str = "%Y-%m-%d %H:%M";

pub fn index(viewer: &User, counts: Counts) -> Markup {
	page::layout(
		"Administration",
		Some(viewer),
		html! {
			table.admin {
				tr { th { "Model" } th { "Rows" } }
				tr { td { a href="/admin/posts/" { "Posts" } } td { (counts.posts) } }
				tr { td { a href="/admin/comments/" { "Comments" } } td { (counts.comments) } }
				tr { td { a href="/admin/follows/" { "Follows" } } td { (counts.follows) } }
				tr { td { a href="/admin/groups/" { "Groups" } } td { (counts.groups) } }
				tr { td { "Users" } td { (counts.users) } }
			}
			form method="post" action="/admin/cache/clear/" {
				button type="submit" { "Clear page cache" }
			}
		},
	)
}

/// Search box and date filter links for a listing at `path`.
fn filters(path: &str, query: &AdminQuery) -> Markup {
	let search = query.search().unwrap_or_default();
	let active = query.date_filter();
	let link = |since: Option<DateFilter>| {
		let mut pairs = Vec::new();

		if !search.is_empty() {
			pairs.push(("q", search.as_str()));
		}

		if let Some(since) = since {
			pairs.push(("since", since.as_str()));
		}

		let encoded = serde_urlencoded::to_string(pairs).unwrap_or_default();

		if encoded.is_empty() {
			path.to_owned()
		} else {
			format!("{path}?{encoded}")
		}
	};

	html! {
		form.search method="get" action=(path) {
			input type="search" name="q" value=(search);
			@if let Some(since) = active {
				input type="hidden" name="since" value=(since.as_str());
			}
			button type="submit" { "Search" }
		}
		ul.date-filter {
			li { a.selected[active.is_none()] href=(link(None)) { "Any date" } }
			@for since in DateFilter::ALL {
				li { a.selected[active == Some(since)] href=(link(Some(since))) { (since.label()) } }
			}
		}
	}
}

pub fn posts(viewer: &User, posts: &Page<Post>, query: &AdminQuery) -> Markup {
	page::layout(
		"Posts",
		Some(viewer),
		html! {
			(filters("/admin/posts/", query))
			p.total { (posts.total) " posts" }
			table.admin {
				tr { th { "pk" } th { "Text" } th { "Published" } th { "Author" } th { "Group" } }
				@for post in &posts.items {
					tr {
						td { a href=(post.url()) { (post.id.to_string()) } }
						td { (post.text) }
						td { (post.pub_date.format(TIMESTAMP).to_string()) }
						td { (post.author_username) }
						td { (post.group_title.as_deref().unwrap_or(EMPTY_VALUE)) }
					}
				}
			}
			(page::paginator(posts, &query.filters()))
		},
	)
}

pub fn comments(viewer: &User, comments: &Page<Comment>, query: &AdminQuery) -> Markup {
	page::layout(
		"Comments",
		Some(viewer),
		html! {
			(filters("/admin/comments/", query))
			p.total { (comments.total) " comments" }
			table.admin {
				tr { th { "Post" } th { "Author" } th { "Text" } th { "Created" } }
				@for comment in &comments.items {
					tr {
						td { a href=(comment.post_url()) { (comment.post_id.to_string()) } }
						td { (comment.author_username) }
						td { (comment.text) }
						td { (comment.created.format(TIMESTAMP).to_string()) }
					}
				}
			}
			(page::paginator(comments, &query.filters()))
		},
	)
}

pub fn follows(viewer: &User, follows: &Page<Follow>) -> Markup {
	page::layout(
		"Follows",
		Some(viewer),
		html! {
			p.total { (follows.total) " follows" }
			table.admin {
				tr { th { "User" } th { "Author" } }
				@for follow in &follows.items {
					tr {
						td { (follow.user_username) }
						td { (follow.author_username) }
					}
				}
			}
			(page::paginator(follows, ""))
		},
	)
}

pub fn groups(viewer: &User, groups: &[Group], input: &GroupForm, errors: &FormErrors) -> Markup {
	page::layout(
		"Groups",
		Some(viewer),
		html! {
			table.admin {
				tr { th { "Title" } th { "Slug" } th { "Description" } }
				@for group in groups {
					tr {
						td { a href=(group.url()) { (group.title) } }
						td { (group.slug) }
						td {
							@if group.description.is_empty() {
								(EMPTY_VALUE)
							} @else {
								(group.description)
							}
						}
					}
				}
			}
			h2 { "Add group" }
			form method="post" action="/admin/groups/" {
				p {
					label for="title" { "Title" }
					input id="title" type="text" name="title" value=(input.title) required;
					(errors.field("title"))
				}
				p {
					label for="slug" { "Slug" }
					input id="slug" type="text" name="slug" value=(input.slug) required;
					(errors.field("slug"))
				}
				p {
					label for="description" { "Description" }
					textarea id="description" name="description" rows="3" { (input.description) }
				}
				button type="submit" { "Save" }
			}
		},
	)
}
