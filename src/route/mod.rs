use axum::{extract::DefaultBodyLimit, Router};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	services::ServeDir,
	trace::TraceLayer,
};

use crate::{media, page, AppState};

pub mod admin;
pub mod auth;
pub mod comment;
pub mod group;
pub mod model;
pub mod post;
pub mod profile;

/// Builds the application router with every route, the media files and the
/// shared middleware. Rate limiting is left to the binary since it needs the
/// peer address.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
	let media = ServeDir::new(state.media.root());

	Router::new()
		.merge(auth::routes())
		.merge(admin::routes())
		.merge(group::routes())
		.merge(post::routes())
		.merge(comment::routes())
		.merge(profile::routes())
		.nest_service(media::URL_PREFIX, media)
		.fallback(page::fallback)
		.layer(DefaultBodyLimit::max(max_upload_bytes))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}
