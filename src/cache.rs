use std::{sync::Arc, time::Duration};

use moka::future::Cache;

/// Maximum number of distinct URLs kept at once.
const MAX_ENTRIES: u64 = 1_000;

/// Rendered page fragments keyed by request URL, each expiring a fixed time after insertion.
///
/// Writes to the underlying data never invalidate entries: readers see the cached
/// markup until it expires or [`PageCache::clear`] is called.
#[derive(Clone)]
pub struct PageCache {
	inner: Cache<String, Arc<str>>,
}

impl PageCache {
	pub fn new(ttl: Duration) -> Self {
		Self {
			inner: Cache::builder()
				.max_capacity(MAX_ENTRIES)
				.time_to_live(ttl)
				.build(),
		}
	}

	pub async fn get(&self, url: &str) -> Option<Arc<str>> {
		self.inner.get(url).await
	}

	pub async fn insert(&self, url: String, markup: Arc<str>) {
		self.inner.insert(url, markup).await;
	}

	/// Drops every cached page.
	pub fn clear(&self) {
		self.inner.invalidate_all();
		tracing::info!("page cache cleared");
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[tokio::test]
	async fn test_cache_serves_stale_until_cleared() {
		let cache = PageCache::new(Duration::from_secs(60));

		assert!(cache.get("/").await.is_none());

		cache.insert("/".into(), "first".into()).await;
		cache.insert("/?page=2".into(), "second".into()).await;

		assert_eq!(cache.get("/").await.as_deref(), Some("first"));
		assert_eq!(cache.get("/?page=2").await.as_deref(), Some("second"));

		cache.clear();

		assert!(cache.get("/").await.is_none());
		assert!(cache.get("/?page=2").await.is_none());
	}

	#[tokio::test]
	async fn test_cache_entries_expire() {
		let cache = PageCache::new(Duration::from_millis(50));

		cache.insert("/".into(), "feed".into()).await;
		tokio::time::sleep(Duration::from_millis(120)).await;

		assert!(cache.get("/").await.is_none());
	}
}
