//! Redis-backed key-value cache.
//!
//! Strings with optional expiry plus hash values. Independent of the
//! relational store.

use std::collections::HashMap;
use std::time::Duration;

use redis::{AsyncCommands, Expiry};
use redis::aio::MultiplexedConnection;
use tracing::{debug, info};

use crate::config::CacheConfig;
use crate::error::{AppError, AppResult};

/// Remaining lifetime of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Key exists without an expiry (-1)
    Persistent,
    /// Key does not exist (-2)
    Missing,
    /// Key expires after this long
    Expires(Duration),
}

impl Ttl {
    /// Interpret a raw `TTL` reply.
    pub fn from_raw(seconds: i64) -> Self {
        match seconds {
            -1 => Self::Persistent,
            s if s >= 0 => Self::Expires(Duration::from_secs(s as u64)),
            _ => Self::Missing,
        }
    }

    /// The store's integer form: -1, -2, or whole seconds.
    pub fn as_raw(&self) -> i64 {
        match self {
            Self::Persistent => -1,
            Self::Missing => -2,
            Self::Expires(d) => d.as_secs() as i64,
        }
    }
}

/// Async cache client over a single multiplexed connection.
#[derive(Clone)]
pub struct CacheClient {
    conn: MultiplexedConnection,
}

impl CacheClient {
    /// Connect to the configured database index.
    pub async fn connect(config: &CacheConfig) -> AppResult<Self> {
        let client = redis::Client::open(config.connection_url())
            .map_err(|e| AppError::Cache(format!("Invalid cache URL: {}", e)))?;

        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Cache(format!("Failed to connect to cache: {}", e)))?;

        info!(db = config.db, "Cache connection established");
        Ok(Self { conn })
    }

    /// Set a value without expiry, clearing any previous expiry.
    pub async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        debug!(key, "SET");
        Ok(())
    }

    /// Set a value that expires after `ttl`.
    pub async fn set_ex(&self, key: &str, ttl: Duration, value: &str) -> AppResult<()> {
        let seconds = expiry_seconds(ttl)?;
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(key, value, seconds).await?;
        debug!(key, seconds, "SETEX");
        Ok(())
    }

    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    /// Get a value and replace its expiry with `ttl`.
    pub async fn get_ex(&self, key: &str, ttl: Duration) -> AppResult<Option<String>> {
        let seconds = expiry_seconds(ttl)?;
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get_ex(key, Expiry::EX(seconds)).await?;
        Ok(value)
    }

    /// Get a value and delete the key.
    pub async fn get_del(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get_del(key).await?;
        Ok(value)
    }

    /// Delete a key. Returns true if it existed.
    pub async fn del(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(key).await?;
        Ok(removed > 0)
    }

    /// Set the expiry of an existing key. Returns false if the key is absent.
    pub async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let seconds = expiry_seconds(ttl)?;
        let mut conn = self.conn.clone();
        let applied: bool = conn.expire(key, seconds as i64).await?;
        Ok(applied)
    }

    pub async fn ttl(&self, key: &str) -> AppResult<Ttl> {
        let mut conn = self.conn.clone();
        let raw: i64 = conn.ttl(key).await?;
        Ok(Ttl::from_raw(raw))
    }

    /// Set several fields of a hash.
    pub async fn hset(&self, key: &str, fields: &HashMap<String, String>) -> AppResult<()> {
        if fields.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "No fields given for hash {}",
                key
            )));
        }

        let items: Vec<(&str, &str)> = fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let mut conn = self.conn.clone();
        let _: () = conn.hset_multiple(key, &items).await?;
        debug!(key, fields = items.len(), "HSET");
        Ok(())
    }

    /// All fields of a hash; empty if the key is absent.
    pub async fn hgetall(&self, key: &str) -> AppResult<HashMap<String, String>> {
        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> = conn.hgetall(key).await?;
        Ok(fields)
    }
}

/// Whole seconds of an expiry; zero is rejected by the store.
fn expiry_seconds(ttl: Duration) -> AppResult<u64> {
    match ttl.as_secs() {
        0 => Err(AppError::InvalidInput(
            "Expiry must be at least one second".to_string(),
        )),
        s => Ok(s),
    }
}
