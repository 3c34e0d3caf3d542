use std::{sync::Arc, time::Duration};

use axum::{
	body::Body,
	response::{IntoResponse, Response},
};
use governor::{
	clock::QuantaInstant,
	middleware::{RateLimitingMiddleware, StateInformationMiddleware},
};
use tower_governor::{
	governor::{GovernorConfig, GovernorConfigBuilder},
	key_extractor::{KeyExtractor, PeerIpKeyExtractor},
	GovernorError,
};

/// Requests replenished per second for each peer.
const PER_SECOND: u64 = 10;
/// Requests a peer may burst before being limited. Pages pull in images, so
/// this leaves room for a full feed.
const BURST_SIZE: u32 = 50;

/// Per-IP limits applied to every route.
pub fn default() -> Option<Arc<GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>>> {
	GovernorConfigBuilder::default()
		.per_second(PER_SECOND)
		.burst_size(BURST_SIZE)
		.use_headers()
		.error_handler(error_handler)
		.finish()
		.map(Arc::new)
}

/// Renders the 429 page.
fn error_handler(error: GovernorError) -> Response<Body> {
	crate::Error::from(error).into_response()
}

/// Periodically forgets peers whose limits have fully replenished.
pub fn cleanup_old_limits<T, M>(configs: &[&Arc<GovernorConfig<T, M>>])
where
	T: KeyExtractor,
	<T as KeyExtractor>::Key: Send + Sync + 'static,
	M: RateLimitingMiddleware<QuantaInstant> + Send + Sync + 'static,
{
	let limiters = configs
		.iter()
		.map(|config| config.limiter().clone())
		.collect::<Vec<_>>();
	let interval = Duration::from_secs(60);

	std::thread::spawn(move || loop {
		std::thread::sleep(interval);

		for limiter in &limiters {
			tracing::debug!(peers = limiter.len(), "pruning rate limiter storage");

			limiter.retain_recent();
		}
	});
}
