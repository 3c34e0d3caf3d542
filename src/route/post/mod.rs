use axum::routing::get;
use uuid::Uuid;

use crate::AppState;

pub mod model;
pub mod route;
pub mod view;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
}

impl From<Error> for crate::Error {
	fn from(error: Error) -> Self {
		tracing::debug!(%error, "lookup failed");

		match error {
			Error::UnknownPost(..) => Self::NotFound("post"),
		}
	}
}

pub fn routes() -> axum::Router<AppState> {
	use route::*;

	axum::Router::new()
		.route("/", get(index))
		.route("/new/", get(new_post_form).post(create_post))
		.route("/:username/:post_id/", get(post_view))
		.route("/:username/:post_id/edit/", get(edit_post_form).post(edit_post))
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_not_auth_user_create_post(pool: Database) {
		let app = app(pool);

		let response = app.anonymous.get("/new/").await;

		assert_eq!(response.status_code(), StatusCode::FOUND);
		assert!(response
			.header("location")
			.to_str()
			.unwrap()
			.starts_with("/auth/login/"));

		let response = app.anonymous_post("test test test", None, None).await;

		assert_eq!(response.status_code(), StatusCode::FOUND);
		assert!(response
			.header("location")
			.to_str()
			.unwrap()
			.starts_with("/auth/login/"));
		assert_eq!(count(&app.state.database, "post").await, 0);
	}

	#[sqlx::test]
	async fn test_auth_user_create_post(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;

		let response = app.create_post("test test test", None, None).await;

		assert_eq!(response.status_code(), StatusCode::FOUND);
		assert_eq!(response.header("location"), "/");

		let response = app.client.get("/test_user/").await;

		assert_eq!(response.text().matches(r#"<article class="post">"#).count(), 1);
		assert!(response.text().contains("test test test"));
	}

	#[sqlx::test]
	async fn test_auth_user_view_post(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;
		app.create_post("test test test", None, None).await;

		let post_id = only_post_id(&app.state.database).await;

		for url in ["/".to_owned(), "/test_user/".to_owned(), format!("/test_user/{post_id}/")] {
			let response = app.client.get(&url).await;

			assert_eq!(response.status_code(), StatusCode::OK, "{url}");
			assert!(response.text().contains("test test test"), "{url}");
		}
	}

	#[sqlx::test]
	async fn test_auth_user_change_post(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;
		app.create_post("test test test", None, None).await;

		let post_id = only_post_id(&app.state.database).await;
		let pub_date: chrono::DateTime<chrono::Utc> = sqlx::query_scalar("SELECT pub_date FROM post")
			.fetch_one(&app.state.database)
			.await
			.unwrap();

		let (content_type, body) = multipart(&[("text", None, b"change change change")]);
		let response = app
			.client
			.post(&format!("/test_user/{post_id}/edit/"))
			.content_type(&content_type)
			.bytes(body)
			.await;

		assert_eq!(response.status_code(), StatusCode::FOUND);
		assert_eq!(response.header("location"), format!("/test_user/{post_id}/").as_str());

		for url in ["/".to_owned(), "/test_user/".to_owned(), format!("/test_user/{post_id}/")] {
			let text = app.client.get(&url).await.text();

			assert!(text.contains("change change change"), "{url}");
			assert!(!text.contains("test test test"), "{url}");
		}

		let edited: chrono::DateTime<chrono::Utc> = sqlx::query_scalar("SELECT pub_date FROM post")
			.fetch_one(&app.state.database)
			.await
			.unwrap();

		assert_eq!(pub_date, edited);
	}

	#[sqlx::test]
	async fn test_edit_by_other_user_redirects(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;
		app.create_post("test test test", None, None).await;

		let post_id = only_post_id(&app.state.database).await;
		let other = app.login_as("other_user").await;

		let (content_type, body) = multipart(&[("text", None, b"hijacked")]);
		let response = other
			.post(&format!("/test_user/{post_id}/edit/"))
			.content_type(&content_type)
			.bytes(body)
			.await;

		assert_eq!(response.status_code(), StatusCode::FOUND);
		assert_eq!(response.header("location"), format!("/test_user/{post_id}/").as_str());

		let text: String = sqlx::query_scalar("SELECT text FROM post")
			.fetch_one(&app.state.database)
			.await
			.unwrap();

		assert_eq!(text, "test test test");
	}

	#[sqlx::test]
	async fn test_blank_post_rerenders_form(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;

		let response = app.create_post("   ", None, None).await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert!(response.text().contains("This field is required."));
		assert_eq!(count(&app.state.database, "post").await, 0);
	}

	#[sqlx::test]
	async fn test_unknown_group_rerenders_form(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;

		let response = app
			.create_post("test test test", Some(uuid::Uuid::new_v4()), None)
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert!(response.text().contains("Select a valid choice."));
		assert_eq!(count(&app.state.database, "post").await, 0);
	}

	#[sqlx::test]
	async fn test_post_view_with_wrong_author_is_404(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;
		app.create_post("test test test", None, None).await;

		let post_id = only_post_id(&app.state.database).await;

		let response = app.client.get(&format!("/someone_else/{post_id}/")).await;
		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

		let response = app.client.get("/test_user/not-a-uuid/").await;
		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
	}

	#[sqlx::test]
	async fn test_image_on_all_views(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;
		let group = create_group(&app.state.database, "test1").await;

		app.create_post("test test test", Some(group), Some(("1.png", &png())))
			.await;

		let post_id = only_post_id(&app.state.database).await;

		for url in [
			"/".to_owned(),
			"/test_user/".to_owned(),
			"/group/test1/".to_owned(),
			format!("/test_user/{post_id}/"),
		] {
			let response = app.client.get(&url).await;

			assert_eq!(response.status_code(), StatusCode::OK, "{url}");
			assert!(response.text().contains("<img"), "{url}");
		}

		let image: String = sqlx::query_scalar("SELECT image FROM post")
			.fetch_one(&app.state.database)
			.await
			.unwrap();

		let response = app.client.get(&format!("/media/{image}")).await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert_eq!(response.as_bytes().as_ref(), png().as_slice());
	}

	#[sqlx::test]
	async fn test_image_wrong_format(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;
		let group = create_group(&app.state.database, "test1").await;

		let response = app
			.create_post(
				"test test test",
				Some(group),
				Some(("test_text.txt", b"this is not an image")),
			)
			.await;

		assert_eq!(response.status_code(), StatusCode::FOUND);

		let post_id = only_post_id(&app.state.database).await;

		for url in [
			"/".to_owned(),
			"/test_user/".to_owned(),
			"/group/test1/".to_owned(),
			format!("/test_user/{post_id}/"),
		] {
			let response = app.client.get(&url).await;

			assert_eq!(response.status_code(), StatusCode::OK, "{url}");
			assert!(response.text().contains("test test test"), "{url}");
			assert!(!response.text().contains("<img"), "{url}");
		}
	}

	#[sqlx::test]
	async fn test_edit_keeps_image_without_new_upload(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;
		app.create_post("test test test", None, Some(("1.png", &png()))).await;

		let post_id = only_post_id(&app.state.database).await;

		let (content_type, body) = multipart(&[("text", None, b"edited"), ("image", Some("x.txt"), b"junk")]);
		app.client
			.post(&format!("/test_user/{post_id}/edit/"))
			.content_type(&content_type)
			.bytes(body)
			.await;

		let image: Option<String> = sqlx::query_scalar("SELECT image FROM post")
			.fetch_one(&app.state.database)
			.await
			.unwrap();

		assert!(image.is_some());
	}

	#[sqlx::test]
	async fn test_edit_replaces_image_file(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;
		app.create_post("test test test", None, Some(("1.png", &png()))).await;

		let post_id = only_post_id(&app.state.database).await;
		let image = |database: Database| async move {
			sqlx::query_scalar::<_, String>("SELECT image FROM post")
				.fetch_one(&database)
				.await
				.unwrap()
		};
		let old = image(app.state.database.clone()).await;

		let (content_type, body) = multipart(&[("text", None, b"edited"), ("image", Some("2.png"), &png())]);
		let response = app
			.client
			.post(&format!("/test_user/{post_id}/edit/"))
			.content_type(&content_type)
			.bytes(body)
			.await;

		assert_eq!(response.status_code(), StatusCode::FOUND);

		let new = image(app.state.database.clone()).await;
		let root = app.state.media.root();

		assert_ne!(old, new);
		assert!(!root.join(&old).exists());
		assert!(root.join(&new).exists());
	}

	#[sqlx::test]
	async fn test_cache(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;
		app.create_post("test test test", None, None).await;

		let response = app.client.get("/").await;

		assert!(response.text().contains("test test test"));

		app.create_post("change change change", None, None).await;

		let response = app.client.get("/").await;

		assert!(!response.text().contains("change change change"));

		app.state.cache.clear();

		let response = app.client.get("/").await;

		assert!(response.text().contains("change change change"));
	}

	#[sqlx::test]
	async fn test_feed_pagination(pool: Database) {
		let app = app(pool);

		let author = app.signup("test_user").await;
		insert_posts(&app.state.database, author, 12).await;

		let first = app.client.get("/").await.text();
		let page = |number: &'static str| app.client.get("/").add_query_param("page", number);

		let second = page("2").await.text();
		let garbage = page("abc").await.text();
		let beyond = page("99").await.text();
		let below = page("0").await.text();
		let repeated = app
			.client
			.get("/")
			.add_query_params(&[("page", "1"), ("page", "2")])
			.await;

		let cards = |html: &str| html.matches(r#"<article class="post">"#).count();

		assert_eq!(cards(&first), 10);
		assert_eq!(cards(&second), 2);
		assert_eq!(cards(&garbage), 10);
		assert_eq!(cards(&beyond), 2);
		assert_eq!(cards(&below), 10);

		// the last value wins, as with any repeated query parameter
		assert_eq!(repeated.status_code(), StatusCode::OK);
		assert_eq!(cards(&repeated.text()), 2);

		// newest first
		assert!(first.contains("post number 12"));
		assert!(!first.contains("post number 1<"));
		assert!(second.contains("post number 1<"));
	}
}
