use axum::routing::post;

use crate::AppState;

pub mod model;
pub mod route;

pub fn routes() -> axum::Router<AppState> {
	axum::Router::new().route("/:username/:post_id/comment/", post(route::add_comment))
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_comment_appears_on_post(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;
		app.create_post("test test test", None, None).await;

		let post_id = only_post_id(&app.state.database).await;
		let url = format!("/test_user/{post_id}/");

		let response = app
			.client
			.post(&format!("{url}comment/"))
			.form(&[("text", "first comment")])
			.await;

		assert_eq!(response.status_code(), StatusCode::FOUND);
		assert_eq!(response.header("location"), url.as_str());

		let text = app.client.get(&url).await.text();

		assert!(text.contains("first comment"));
		assert!(text.contains("Comments (1)"));
	}

	#[sqlx::test]
	async fn test_comments_newest_first(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;
		app.create_post("test test test", None, None).await;

		let post_id = only_post_id(&app.state.database).await;
		let url = format!("/test_user/{post_id}/");

		for text in ["older comment", "newer comment"] {
			app.client
				.post(&format!("{url}comment/"))
				.form(&[("text", text)])
				.await;
		}

		let text = app.client.get(&url).await.text();
		let older = text.find("older comment").unwrap();
		let newer = text.find("newer comment").unwrap();

		assert!(newer < older);
	}

	#[sqlx::test]
	async fn test_blank_comment_rerenders_post(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;
		app.create_post("test test test", None, None).await;

		let post_id = only_post_id(&app.state.database).await;

		let response = app
			.client
			.post(&format!("/test_user/{post_id}/comment/"))
			.form(&[("text", "   ")])
			.await;

		assert_eq!(response.status_code(), StatusCode::OK);
		assert!(response.text().contains("This field is required."));
		assert!(response.text().contains("test test test"));
		assert_eq!(count(&app.state.database, "comment").await, 0);
	}

	#[sqlx::test]
	async fn test_anonymous_comment_redirects_to_login(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;
		app.create_post("test test test", None, None).await;

		let post_id = only_post_id(&app.state.database).await;

		let response = app
			.anonymous
			.post(&format!("/test_user/{post_id}/comment/"))
			.form(&[("text", "sneaky")])
			.await;

		assert_eq!(response.status_code(), StatusCode::FOUND);
		assert!(response
			.header("location")
			.to_str()
			.unwrap()
			.starts_with("/auth/login/"));
		assert_eq!(count(&app.state.database, "comment").await, 0);
	}

	#[sqlx::test]
	async fn test_comment_on_unknown_post_is_404(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;

		let response = app
			.client
			.post(&format!("/test_user/{}/comment/", uuid::Uuid::new_v4()))
			.form(&[("text", "hello")])
			.await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
	}
}
