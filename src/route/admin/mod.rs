use axum::routing::{get, post};

use crate::AppState;

pub mod model;
pub mod route;
mod view;

pub fn routes() -> axum::Router<AppState> {
	use route::*;

	axum::Router::new()
		.route("/admin/", get(index))
		.route("/admin/posts/", get(posts))
		.route("/admin/comments/", get(comments))
		.route("/admin/follows/", get(follows))
		.route("/admin/groups/", get(groups).post(create_group))
		.route("/admin/cache/clear/", post(clear_cache))
}
