use async_trait::async_trait;
use cascata_core::CascataError;
use moka::future::Cache;

use crate::key::CacheKey;
use crate::store::{CacheEntry, CacheStore};

/// In-process store backed by a bounded `moka` cache.
///
/// Entries do not survive the process; expiry is still decided by the
/// caller's max age, not by moka.
#[derive(Clone)]
pub struct MemoryCacheStore {
    inner: Cache<CacheKey, CacheEntry>,
}

impl MemoryCacheStore {
    /// Store holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    /// Number of entries currently held (approximate until pending tasks run).
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new(1_024)
    }
}

impl core::fmt::Debug for MemoryCacheStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryCacheStore")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn load(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.inner.get(key).await
    }

    async fn store(&self, entry: CacheEntry) -> Result<(), CascataError> {
        self.inner.insert(entry.key.clone(), entry).await;
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> Result<(), CascataError> {
        self.inner.invalidate(key).await;
        Ok(())
    }
}
