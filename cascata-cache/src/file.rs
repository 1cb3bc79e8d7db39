use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use cascata_core::CascataError;

use crate::key::CacheKey;
use crate::store::{CacheEntry, CacheStore};

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Durable store writing one JSON file per key under a root directory.
///
/// Writes land in a unique `.tmp` sibling and are renamed into place, so a
/// reader never observes a half-written entry.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    root: PathBuf,
}

impl FileCacheStore {
    /// Store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    fn tmp_path(&self, key: &CacheKey) -> PathBuf {
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            "{}.{}.{seq}.tmp",
            key.file_name(),
            std::process::id()
        ))
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn load(&self, key: &CacheKey) -> Option<CacheEntry> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cache read failed");
                return None;
            }
        };
        match serde_json::from_slice::<CacheEntry>(&bytes) {
            Ok(entry) if entry.key == *key => Some(entry),
            Ok(entry) => {
                tracing::warn!(
                    path = %path.display(),
                    expected = %key,
                    found = %entry.key,
                    "cache file holds a different key; ignoring"
                );
                None
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt cache file; ignoring");
                None
            }
        }
    }

    async fn store(&self, entry: CacheEntry) -> Result<(), CascataError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| CascataError::Cache(format!("create {}: {e}", self.root.display())))?;

        let bytes = serde_json::to_vec_pretty(&entry)
            .map_err(|e| CascataError::Cache(format!("encode {}: {e}", entry.key)))?;
        let tmp = self.tmp_path(&entry.key);
        let dest = self.path_for(&entry.key);

        if let Err(e) = tokio::fs::write(&tmp, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(CascataError::Cache(format!("write {}: {e}", tmp.display())));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &dest).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(CascataError::Cache(format!(
                "rename into {}: {e}",
                dest.display()
            )));
        }
        tracing::debug!(path = %dest.display(), "cache entry written");
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> Result<(), CascataError> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CascataError::Cache(format!(
                "remove {}: {e}",
                path.display()
            ))),
        }
    }
}
