// Response cache keyed by user and request type

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

pub use memory::InMemoryCache;
pub use self::redis::RedisCache;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Pluggable cache backend. Values are opaque strings; use `get_json` and
/// `set_json` for typed access.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Removes every entry whose key starts with `prefix`, returning how many.
    async fn invalidate_prefix(&self, prefix: &str) -> Result<u64, CacheError>;
}

/// `"{user_id}:{request_type}:{md5(context)}"`
pub fn cache_key(user_id: Uuid, request_type: &str, context: &str) -> String {
    format!("{}:{}:{:x}", user_id, request_type, md5::compute(context.as_bytes()))
}

/// Matches every entry of one user.
pub fn user_prefix(user_id: Uuid) -> String {
    format!("{}:", user_id)
}

/// Matches every entry of one request type for one user.
pub fn request_prefix(user_id: Uuid, request_type: &str) -> String {
    format!("{}:{}:", user_id, request_type)
}

pub async fn get_json<T: DeserializeOwned>(
    cache: &dyn Cache,
    key: &str,
) -> Result<Option<T>, CacheError> {
    match cache.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub async fn set_json<T: Serialize + Sync>(
    cache: &dyn Cache,
    key: &str,
    value: &T,
    ttl: Duration,
) -> Result<(), CacheError> {
    let raw = serde_json::to_string(value)?;
    cache.set(key, raw, ttl).await
}
