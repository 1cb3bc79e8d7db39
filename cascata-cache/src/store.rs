use std::time::Duration;

use async_trait::async_trait;
use cascata_core::{CascataError, FetchResult};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::key::CacheKey;

/// One persisted cache record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Key the entry was stored under.
    pub key: CacheKey,
    /// Serialized `FetchResult`, kept opaque to the store.
    pub payload: serde_json::Value,
    /// When the entry was written.
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Serialize `result` into a fresh entry stamped now.
    ///
    /// # Errors
    /// Returns `CascataError::Cache` if the payload cannot be serialized.
    pub fn encode<T: Serialize>(key: CacheKey, result: &FetchResult<T>) -> Result<Self, CascataError> {
        let payload = serde_json::to_value(result)
            .map_err(|e| CascataError::Cache(format!("encode {key}: {e}")))?;
        Ok(Self {
            key,
            payload,
            stored_at: Utc::now(),
        })
    }

    /// True when the entry is older than `max_age` at `now`.
    #[must_use]
    pub fn is_expired(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        let Ok(max_age) = chrono::Duration::from_std(max_age) else {
            return false;
        };
        now.signed_duration_since(self.stored_at) > max_age
    }
}

/// Raw storage backend: one live entry per key, last write wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read the entry for `key`. Missing or unreadable entries are `None`.
    async fn load(&self, key: &CacheKey) -> Option<CacheEntry>;

    /// Insert or replace the entry under `entry.key`.
    async fn store(&self, entry: CacheEntry) -> Result<(), CascataError>;

    /// Drop the entry for `key` if present.
    async fn remove(&self, key: &CacheKey) -> Result<(), CascataError>;
}

impl dyn CacheStore {
    /// Typed read honoring `max_age`. Expired and undecodable entries are absent.
    pub async fn get<T: DeserializeOwned>(
        &self,
        key: &CacheKey,
        max_age: Duration,
    ) -> Option<FetchResult<T>> {
        let entry = self.load(key).await?;
        if entry.is_expired(max_age, Utc::now()) {
            tracing::debug!(key = %key, stored_at = %entry.stored_at, "cache entry expired");
            return None;
        }
        match serde_json::from_value(entry.payload) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache payload does not decode; ignoring");
                None
            }
        }
    }

    /// Typed write; overwrites any existing entry for `key`.
    ///
    /// # Errors
    /// Returns `CascataError::Cache` on encode or storage failure.
    pub async fn put<T: Serialize + Sync>(
        &self,
        key: CacheKey,
        result: &FetchResult<T>,
    ) -> Result<(), CascataError> {
        let entry = CacheEntry::encode(key, result)?;
        self.store(entry).await
    }
}
