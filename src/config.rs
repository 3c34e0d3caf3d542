use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

fn default_host() -> String {
	"127.0.0.1".into()
}

fn default_port() -> u16 {
	3000
}

fn default_media_root() -> PathBuf {
	"media".into()
}

fn default_feed_cache_ttl() -> u64 {
	20
}

fn default_max_upload_bytes() -> usize {
	5 * 1024 * 1024
}

/// Runtime configuration, read from the environment (and a `.env` file if present).
///
/// Every field maps to the upper-case environment variable of the same name,
/// e.g. `feed_cache_ttl` is read from `FEED_CACHE_TTL`.
#[derive(Debug, Deserialize)]
pub struct Config {
	pub database_url: String,
	#[serde(default = "default_host")]
	pub host: String,
	#[serde(default = "default_port")]
	pub port: u16,
	/// Directory uploaded images are written to and served from.
	#[serde(default = "default_media_root")]
	pub media_root: PathBuf,
	/// Lifetime of a cached feed page, in seconds.
	#[serde(default = "default_feed_cache_ttl")]
	pub feed_cache_ttl: u64,
	#[serde(default = "default_max_upload_bytes")]
	pub max_upload_bytes: usize,
	/// OTLP collector endpoint. Spans are only exported when this is set.
	#[serde(default)]
	pub otlp_endpoint: Option<String>,
}

impl Config {
	pub fn from_env() -> Result<Self, envy::Error> {
		dotenvy::dotenv().ok();
		envy::from_env()
	}

	pub fn feed_cache_ttl(&self) -> Duration {
		Duration::from_secs(self.feed_cache_ttl)
	}
}
