use axum::routing::get;

use crate::AppState;

pub mod model;
pub mod route;

pub fn routes() -> axum::Router<AppState> {
	axum::Router::new().route("/group/:slug/", get(route::group_posts))
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_group_page_lists_only_group_posts(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;
		let cats = create_group(&app.state.database, "cats").await;

		app.create_post("a post about cats", Some(cats), None).await;
		app.create_post("a post about nothing", None, None).await;

		let response = app.client.get("/group/cats/").await;

		assert_eq!(response.status_code(), StatusCode::OK);

		let text = response.text();

		assert!(text.contains("a post about cats"));
		assert!(!text.contains("a post about nothing"));
	}

	#[sqlx::test]
	async fn test_unknown_group_is_404(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;

		let response = app.client.get("/group/nope/").await;

		assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
	}

	#[sqlx::test]
	async fn test_deleting_group_keeps_posts(pool: Database) {
		let app = app(pool);

		app.signup("test_user").await;
		let cats = create_group(&app.state.database, "cats").await;

		app.create_post("orphaned soon", Some(cats), None).await;

		sqlx::query(r#"DELETE FROM "group" WHERE id = $1"#)
			.bind(cats)
			.execute(&app.state.database)
			.await
			.unwrap();

		let group: Option<uuid::Uuid> = sqlx::query_scalar("SELECT group_id FROM post")
			.fetch_one(&app.state.database)
			.await
			.unwrap();

		assert!(group.is_none());
	}
}
