use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_capacity(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_capacity(max_capacity: u64, ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(std::time::Duration::from_secs(ttl_secs))
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}",
            max_capacity
        );
        Self { inner }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        if let Some(value) = self.inner.get(key).await {
            debug!("Successfully retrieved key: {}", key);
            CacheResult::Found(value)
        } else {
            debug!("Key not found in cache: {}", key);
            CacheResult::NotFound
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        // Moka 使用创建时的全局 TTL
        self.inner.insert(key, value).await;
        if ttl != 0 {
            debug!("Moka cache ignores per-item TTL, using global TTL configuration");
        }
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaCacheWrapper::with_capacity(100, 60);
        assert_eq!(cache.get_raw("user:a").await, CacheResult::NotFound);

        cache
            .insert_raw("user:a".to_string(), "{}".to_string(), 0)
            .await;
        assert_eq!(
            cache.get_raw("user:a").await,
            CacheResult::Found("{}".to_string())
        );

        cache.remove("user:a").await;
        assert_eq!(cache.get_raw("user:a").await, CacheResult::NotFound);
    }
}
