//! Markup shared by every page: the layout, pagination links, form errors,
//! redirects and the fixed error pages.

use std::collections::BTreeMap;

use axum::{
	body::Body,
	http::{header, Response, StatusCode, Uri},
	response::IntoResponse,
};
use maud::{html, Markup, DOCTYPE};
use validator::ValidationErrors;

use crate::route::{auth::model::User, model::Page};

pub const SITE_NAME: &str = "Postbook";
/// Shown in admin tables for missing values.
pub const EMPTY_VALUE: &str = "-empty-";

/// Wraps page content in the site layout.
///
/// The navigation depends on `viewer`, so anything cached across users must be
/// rendered separately and passed in as `content`.
pub fn layout(title: &str, viewer: Option<&User>, content: Markup) -> Markup {
	html! {
		(DOCTYPE)
		html lang="en" {
			head {
				meta charset="utf-8";
				meta name="viewport" content="width=device-width, initial-scale=1";
				title { (title) " | " (SITE_NAME) }
			}
			body {
				header {
					nav {
						a href="/" { (SITE_NAME) }
						@if let Some(user) = viewer {
							" "
							a href="/new/" { "New post" }
							" "
							a href="/follow/" { "Following" }
							" "
							a href={ "/" (user.username) "/" } { (user.username) }
							@if user.is_staff {
								" "
								a href="/admin/" { "Admin" }
							}
							" "
							a href="/auth/logout/" { "Log out" }
						} @else {
							" "
							a href="/auth/login/" { "Log in" }
							" "
							a href="/auth/signup/" { "Sign up" }
						}
					}
				}
				main {
					h1 { (title) }
					(content)
				}
			}
		}
	}
}

/// Previous/next links for a paginated listing.
///
/// `query` holds extra query parameters (already encoded) to keep on every link.
pub fn paginator<T>(page: &Page<T>, query: &str) -> Markup {
	let href = |number: i64| {
		if query.is_empty() {
			format!("?page={number}")
		} else {
			format!("?{query}&page={number}")
		}
	};

	html! {
		@if page.num_pages > 1 {
			nav.paginator {
				@if page.has_previous() {
					a href=(href(1)) { "« first" }
					" "
					a href=(href(page.number - 1)) { "previous" }
					" "
				}
				span.current { "Page " (page.number) " of " (page.num_pages) }
				@if page.has_next() {
					" "
					a href=(href(page.number + 1)) { "next" }
					" "
					a href=(href(page.num_pages)) { "last »" }
				}
			}
		}
	}
}

/// Field errors collected while validating a submitted form.
#[derive(Debug, Default)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
	pub fn add(&mut self, field: &str, message: impl Into<String>) {
		self.0.entry(field.to_owned()).or_default().push(message.into());
	}

	pub fn get(&self, field: &str) -> &[String] {
		self.0.get(field).map_or(&[], Vec::as_slice)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Renders the errors of a single field.
	pub fn field(&self, field: &str) -> Markup {
		html! {
			@for message in self.get(field) {
				p.error { (message) }
			}
		}
	}
}

impl From<ValidationErrors> for FormErrors {
	fn from(errors: ValidationErrors) -> Self {
		let mut form = Self::default();

		for (field, errors) in errors.field_errors() {
			for error in errors {
				let message = error
					.message
					.as_ref()
					.map_or_else(|| error.code.to_string(), ToString::to_string);

				form.add(&field.to_string(), message);
			}
		}

		form
	}
}

/// A `302 Found` redirect.
pub fn redirect(location: &str) -> Response<Body> {
	(StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}

/// Redirects to the login form, coming back to `next` afterwards.
pub fn login_redirect(next: &str) -> Response<Body> {
	let query = serde_urlencoded::to_string([("next", next)]).unwrap_or_default();

	redirect(&format!("/auth/login/?{query}"))
}

pub fn error(status: StatusCode, message: &str) -> Response<Body> {
	let title = status.canonical_reason().unwrap_or("Error");

	(
		status,
		layout(
			title,
			None,
			html! {
				p { (message) }
				p { a href="/" { "Back to the feed" } }
			},
		),
	)
		.into_response()
}

pub fn not_found(path: Option<&str>) -> Response<Body> {
	let message = match path {
		Some(path) => format!("The page {path} does not exist."),
		None => "The page you are looking for does not exist.".to_owned(),
	};

	error(StatusCode::NOT_FOUND, &message)
}

pub fn server_error() -> Response<Body> {
	error(
		StatusCode::INTERNAL_SERVER_ERROR,
		"Something went wrong on our side. Please try again later.",
	)
}

/// Fallback handler for unknown routes.
pub async fn fallback(uri: Uri) -> Response<Body> {
	not_found(Some(uri.path()))
}

#[cfg(test)]
mod test {
	use validator::{ValidationError, ValidationErrors};

	use super::*;

	#[test]
	fn test_form_errors_from_validation() {
		let mut errors = ValidationErrors::new();
		let mut error = ValidationError::new("blank");
		error.message = Some("This field is required.".into());
		errors.add("text", error);
		errors.add("group_id", ValidationError::new("invalid_choice"));

		let form = FormErrors::from(errors);

		assert!(!form.is_empty());
		assert_eq!(form.get("text"), ["This field is required."]);
		assert_eq!(form.get("group_id"), ["invalid_choice"]);
		assert!(form.get("image").is_empty());
	}

	#[test]
	fn test_redirect_is_302() {
		let response = redirect("/");

		assert_eq!(response.status(), StatusCode::FOUND);
		assert_eq!(response.headers()[header::LOCATION], "/");
	}

	#[test]
	fn test_login_redirect_keeps_next() {
		let response = login_redirect("/new/");

		assert_eq!(
			response.headers()[header::LOCATION],
			"/auth/login/?next=%2Fnew%2F"
		);
	}

	#[test]
	fn test_paginator_links() {
		let page = Page::new(vec![(); 10], 2, 3, 25);
		let markup = paginator(&page, "q=rust").into_string();

		assert!(markup.contains("?q=rust&amp;page=1"));
		assert!(markup.contains("?q=rust&amp;page=3"));
		assert!(markup.contains("Page 2 of 3"));

		let single = Page::new(vec![(); 3], 1, 1, 3);

		assert!(paginator(&single, "").into_string().is_empty());
	}
}
