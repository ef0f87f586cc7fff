//! Two-tier response cache with tag-based invalidation.
//!
//! L1 (Moka) is in-process with a short TTL; L2 (Redis) is shared across
//! instances. Entries register with their cache tags so invalidating a tag
//! evicts every response that depended on it.

mod metadata;

pub use metadata::CacheableMetadata;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use redis::AsyncCommands;
use redis::Client as RedisClient;
use tracing::{debug, warn};

/// TTL for L1 entries (60 seconds).
const L1_TTL_SECS: u64 = 60;

/// Fallback TTL for L2 entries (5 minutes).
const L2_TTL_SECS: u64 = 300;

/// Maximum L1 entry count.
const L1_MAX_CAPACITY: u64 = 10_000;

/// Two-tier cache layer.
#[derive(Clone)]
pub struct CacheLayer {
    inner: Arc<CacheLayerInner>,
}

struct CacheLayerInner {
    local: Cache<String, String>,
    redis: RedisClient,
}

impl CacheLayer {
    /// Create a new cache layer.
    pub fn new(redis: RedisClient) -> Self {
        let local = Cache::builder()
            .max_capacity(L1_MAX_CAPACITY)
            .time_to_live(Duration::from_secs(L1_TTL_SECS))
            .build();

        Self {
            inner: Arc::new(CacheLayerInner { local, redis }),
        }
    }

    /// Get a value, checking L1 then L2. An L2 hit repopulates L1.
    pub async fn get(&self, key: &str) -> Option<String> {
        if let Some(val) = self.inner.local.get(key).await {
            debug!(key = %key, "cache L1 hit");
            return Some(val);
        }

        let mut conn = match self.inner.redis.get_multiplexed_async_connection().await {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "failed to get Redis connection for cache");
                return None;
            }
        };

        let val: Option<String> = conn.get(key).await.ok()?;

        if let Some(ref v) = val {
            debug!(key = %key, "cache L2 hit, populating L1");
            self.inner.local.insert(key.to_string(), v.clone()).await;
        }

        val
    }

    /// Set a value in both tiers and register it with each tag.
    pub async fn set(&self, key: &str, value: &str, ttl_secs: u64, tags: &[String]) {
        self.inner
            .local
            .insert(key.to_string(), value.to_string())
            .await;

        let Ok(mut conn) = self.inner.redis.get_multiplexed_async_connection().await else {
            warn!("failed to get Redis connection for cache set");
            return;
        };

        let ttl = if ttl_secs > 0 { ttl_secs } else { L2_TTL_SECS };

        if let Err(e) = conn.set_ex::<_, _, ()>(key, value, ttl).await {
            warn!(error = %e, key = %key, "failed to set cache value in Redis");
            return;
        }

        for tag in tags {
            let tag_key = format!("tag:{tag}");
            if let Err(e) = conn.sadd::<_, _, ()>(&tag_key, key).await {
                warn!(error = %e, tag = %tag, "failed to register cache key with tag");
            }
        }

        debug!(key = %key, tags = ?tags, ttl = %ttl, "cache set");
    }

    /// Invalidate a single key in both tiers.
    pub async fn invalidate(&self, key: &str) {
        self.inner.local.invalidate(key).await;

        let Ok(mut conn) = self.inner.redis.get_multiplexed_async_connection().await else {
            warn!("failed to get Redis connection for cache invalidate");
            return;
        };

        if let Err(e) = conn.del::<_, ()>(key).await {
            warn!(error = %e, key = %key, "failed to delete cache key from Redis");
        }

        debug!(key = %key, "cache invalidated");
    }

    /// Invalidate every key registered with a tag.
    pub async fn invalidate_tag(&self, tag: &str) {
        let tag_key = format!("tag:{tag}");

        let Ok(mut conn) = self.inner.redis.get_multiplexed_async_connection().await else {
            warn!("failed to get Redis connection for tag invalidation");
            return;
        };

        let keys: Vec<String> = match conn.smembers(&tag_key).await {
            Ok(k) => k,
            Err(e) => {
                warn!(error = %e, tag = %tag, "failed to get tag members");
                return;
            }
        };

        for key in &keys {
            self.inner.local.invalidate(key).await;
        }

        let script = redis::Script::new(INVALIDATE_TAG_SCRIPT);
        if let Err(e) = script.key(&tag_key).invoke_async::<()>(&mut conn).await {
            warn!(error = %e, tag = %tag, "failed to invalidate tag in Redis");
            return;
        }

        debug!(tag = %tag, keys_invalidated = %keys.len(), "tag invalidated");
    }
}

/// Lua script for atomic tag invalidation: delete all keys in the tag set,
/// then the tag set itself.
const INVALIDATE_TAG_SCRIPT: &str = r#"
local keys = redis.call("SMEMBERS", KEYS[1])
if #keys > 0 then
    redis.call("DEL", unpack(keys))
end
redis.call("DEL", KEYS[1])
return #keys
"#;

impl std::fmt::Debug for CacheLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLayer").finish()
    }
}
