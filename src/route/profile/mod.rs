use axum::routing::{get, post};

use crate::AppState;

pub mod model;
pub mod route;
mod view;

pub fn routes() -> axum::Router<AppState> {
	use route::*;

	axum::Router::new()
		.route("/follow/", get(follow_index))
		.route("/:username/", get(profile))
		.route("/:username/follow/", post(profile_follow))
		.route("/:username/unfollow/", post(profile_unfollow))
}
