use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    ttl: u64, // TTL in seconds
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        debug!(
            "RedisObjectCache created with prefix: '{}', TTL: {}s",
            redis_config.key_prefix, config.cache.default_ttl
        );

        let client = redis::Client::open(redis_config.url.clone())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis_config.url))?;

        // 测试 Redis 连接 - 使用同步连接进行简单测试
        match client.get_connection() {
            Ok(mut conn) => match redis::cmd("PING").query::<String>(&mut conn) {
                Ok(response) => {
                    debug!("Redis connection test successful: {}", response);
                }
                Err(e) => {
                    error!(
                        "Failed to ping Redis server: {}. Check Redis server status and URL: {}",
                        e, redis_config.url
                    );
                    return Err(format!("Redis ping failed: {e}"));
                }
            },
            Err(e) => {
                error!(
                    "Failed to ping Redis server: {}. Check Redis server status and URL: {}",
                    e, redis_config.url
                );
                return Err(format!("Redis ping failed: {e}"));
            }
        }

        Ok(Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
            ttl: config.cache.default_ttl,
        })
    }

    async fn get_connection(&self) -> Result<MultiplexedConnection, redis::RedisError> {
        let client = &self.client;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(conn)
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let redis_key = self.make_key(key);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                return CacheResult::ExistsButNoValue;
            }
        };

        let result: redis::RedisResult<Option<String>> = conn.get(redis_key).await;

        match result {
            Ok(Some(data)) => {
                debug!("Successfully retrieved key: {}", key);
                CacheResult::Found(data)
            }
            Ok(None) => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let redis_key = self.make_key(&key);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                return;
            }
        };

        // 使用传入的 TTL，如果为 0 则使用默认 TTL
        let effective_ttl = if ttl == 0 { self.ttl } else { ttl };

        match conn
            .set_ex::<String, String, ()>(redis_key, value, effective_ttl)
            .await
        {
            Ok(_) => {
                debug!(
                    "Successfully inserted key into cache: {} (TTL: {}s)",
                    key, effective_ttl
                );
            }
            Err(e) => {
                error!("Failed to insert key '{}' into cache: {}", key, e);
            }
        }
    }

    async fn remove(&self, key: &str) {
        let redis_key = self.make_key(key);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                return;
            }
        };

        match conn.del::<String, i32>(redis_key).await {
            Ok(deleted_count) => {
                if deleted_count > 0 {
                    debug!("Successfully removed key from cache: {}", key);
                } else {
                    debug!("Key not found in cache for removal: {}", key);
                }
            }
            Err(e) => {
                error!("Failed to remove key '{}': {}", key, e);
            }
        }
    }

    async fn invalidate_all(&self) {
        // 仅删除本应用前缀下的键
        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                return;
            }
        };

        let pattern = format!("{}*", self.key_prefix);
        let keys: Vec<String> = match conn.keys(&pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Failed to list keys for pattern '{}': {}", pattern, e);
                return;
            }
        };

        if keys.is_empty() {
            return;
        }

        if let Err(e) = conn.del::<Vec<String>, i64>(keys).await {
            error!("Failed to invalidate cache keys: {}", e);
        }
    }
}
