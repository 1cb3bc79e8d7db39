use cascata_cache::CacheKey;
use cascata_core::{CascataError, FetchResult, Period, Provenance};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Cascata;

/// Resolve a period code, substituting the default for unknown codes.
///
/// Runs before cache-key computation so an unknown code never shares a key
/// with some other period.
#[must_use]
pub fn resolve_period(code: &str) -> Period {
    Period::parse(code).unwrap_or_else(|| {
        let fallback = Period::default();
        tracing::warn!(requested = code, substituted = %fallback, "unknown period code");
        fallback
    })
}

/// Collapse an exhaustion error into one readable line.
///
/// Nested `AllSourcesExhausted` errors are flattened; a single underlying
/// failure is reported as-is.
#[must_use]
pub fn collapse_errors(err: &CascataError) -> String {
    let kind = match err {
        CascataError::AllSourcesExhausted { kind, .. } => kind.as_str(),
        other => return other.to_string(),
    };
    let parts: Vec<String> = err
        .clone()
        .flatten()
        .iter()
        .map(ToString::to_string)
        .collect();
    if parts.is_empty() {
        format!("all sources exhausted for {kind}")
    } else {
        format!("all sources exhausted for {kind}: {}", parts.join("; "))
    }
}

/// Failed envelope for kinds that have no substitute payload.
pub(crate) fn fallback_failure<T>(err: &CascataError) -> FetchResult<T> {
    FetchResult {
        error: Some(collapse_errors(err)),
        ..FetchResult::failed(err, Provenance::Fallback)
    }
}

/// Apply an optional deadline to `fut`.
///
/// # Errors
/// Returns `RequestTimeout(capability)` when the deadline elapses first.
pub async fn with_request_deadline<F, T>(
    deadline: Option<std::time::Duration>,
    capability: &'static str,
    fut: F,
) -> Result<T, CascataError>
where
    F: core::future::Future<Output = Result<T, CascataError>>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .unwrap_or_else(|_| Err(CascataError::request_timeout(capability))),
        None => fut.await,
    }
}

impl Cascata {
    /// Fresh cached result for `key`, if any.
    pub(crate) async fn cached_lookup<T: DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> Option<FetchResult<T>> {
        let max_age = self.cfg.cache_max_age.for_kind(key.kind);
        let hit = self.cache.get::<T>(key, max_age).await;
        if let Some(r) = &hit {
            tracing::debug!(key = %key, source = %r.source, "cache hit");
        }
        hit
    }

    /// Store a successful result. Degraded results are skipped unless
    /// `cache_degraded` is set; storage failures are logged only.
    pub(crate) async fn store_result<T: Serialize + Sync>(
        &self,
        key: CacheKey,
        result: &FetchResult<T>,
    ) {
        if !result.success || (result.is_degraded() && !self.cfg.cache_degraded) {
            return;
        }
        let label = key.to_string();
        if let Err(e) = self.cache.put(key, result).await {
            tracing::warn!(key = %label, error = %e, "cache write failed");
        }
    }
}
