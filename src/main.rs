#![warn(clippy::pedantic)]

mod cache;
mod config;
mod error;
mod extract;
mod media;
mod page;
mod ratelimit;
mod route;
mod session;
mod trace;

use std::net::SocketAddr;

use argon2::Argon2;
use tower_governor::GovernorLayer;

pub use error::Error;

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// Everything a handler may need across requests: the connection pool, the
/// password hasher, the feed page cache and the media store. Handlers extract
/// only the parts they use through [`axum::extract::FromRef`].
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub cache: cache::PageCache,
	pub media: media::MediaStore,
}

#[tokio::main]
async fn main() {
	let config = config::Config::from_env().expect("failed to read configuration");
	let _guard = trace::init_tracing_subscriber(config.otlp_endpoint.as_deref());

	let database = Database::connect(&config.database_url)
		.await
		.expect("failed to connect to database");

	sqlx::migrate!()
		.run(&database)
		.await
		.expect("failed to run migrations");

	let state = State {
		database,
		hasher: Argon2::default(),
		cache: cache::PageCache::new(config.feed_cache_ttl()),
		media: media::MediaStore::new(&config.media_root),
	};

	let governor = ratelimit::default().expect("invalid rate limit configuration");

	ratelimit::cleanup_old_limits(&[&governor]);

	let app = route::router(state, config.max_upload_bytes).layer(GovernorLayer { config: governor });

	let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!(host = %config.host, port = config.port, "listening");

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.await
	.expect("server error");
}
