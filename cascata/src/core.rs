use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cascata_cache::{CacheStore, FileCacheStore};
use cascata_core::connector::ConnectorKey;
use cascata_core::{
    CascataConfig, CascataConnector, CascataError, DataKind, RetryConfig, Symbol,
    SyntheticGenerator,
};

use crate::observe::{AttemptEvent, AttemptObserver};

/// Orchestrator that cascades each data kind across registered connectors.
pub struct Cascata {
    pub(crate) connectors: Vec<Arc<dyn CascataConnector>>,
    pub(crate) cfg: CascataConfig,
    pub(crate) cache: Arc<dyn CacheStore>,
    pub(crate) observer: Option<Arc<dyn AttemptObserver>>,
    pub(crate) synthetic: SyntheticGenerator,
}

impl core::fmt::Debug for Cascata {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cascata")
            .field(
                "connectors",
                &self.connectors.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("cfg", &self.cfg)
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a `Cascata` orchestrator with custom configuration.
pub struct CascataBuilder {
    connectors: Vec<Arc<dyn CascataConnector>>,
    cfg: CascataConfig,
    cache: Option<Arc<dyn CacheStore>>,
    observer: Option<Arc<dyn AttemptObserver>>,
}

impl Default for CascataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CascataBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Starts with no connectors and a file cache rooted at
    /// [`DEFAULT_CACHE_DIR`](cascata_core::DEFAULT_CACHE_DIR), so cached
    /// results survive restarts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            cfg: CascataConfig::default(),
            cache: None,
            observer: None,
        }
    }

    /// Register a provider connector.
    ///
    /// Registration order is the cascade order for every kind that has no
    /// explicit preference. Connectors without a capability are skipped for
    /// that kind.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn CascataConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Set the preferred connector order for one data kind.
    ///
    /// Listed connectors go first in the given order; unlisted but capable
    /// connectors follow in registration order.
    #[must_use]
    pub fn prefer_for_kind(mut self, kind: DataKind, keys: &[ConnectorKey]) -> Self {
        self.cfg.per_kind_priority.insert(kind, keys.to_vec());
        self
    }

    /// Replace the whole configuration. Priorities set earlier are kept
    /// unless `cfg` carries its own.
    #[must_use]
    pub fn config(mut self, cfg: CascataConfig) -> Self {
        let priorities = std::mem::take(&mut self.cfg.per_kind_priority);
        self.cfg = cfg;
        if self.cfg.per_kind_priority.is_empty() {
            self.cfg.per_kind_priority = priorities;
        }
        self
    }

    /// Timeout for a single adapter attempt. Elapsed attempts are transient.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Overall deadline for one `analyze` call.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Retry policy applied per adapter to transient failures.
    #[must_use]
    pub const fn retry(mut self, retry: RetryConfig) -> Self {
        self.cfg.retry = retry;
        self
    }

    /// Use a caller-supplied cache store instead of the file cache,
    /// e.g. a [`MemoryCacheStore`](cascata_cache::MemoryCacheStore).
    #[must_use]
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(store);
        self
    }

    /// Root the file cache at `dir`. Replaces any store set earlier.
    #[must_use]
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.cache_dir = dir.into();
        self.cache = None;
        self
    }

    /// Override how long cached results of `kind` stay fresh.
    #[must_use]
    pub const fn cache_max_age(mut self, kind: DataKind, max_age: Duration) -> Self {
        self.cfg.cache_max_age.set(kind, max_age);
        self
    }

    /// Enable or disable the synthetic price fallback.
    #[must_use]
    pub const fn synthetic_fallback(mut self, enabled: bool) -> Self {
        self.cfg.synthetic_fallback = enabled;
        self
    }

    /// Seed price for synthetic series when no profile price is known.
    #[must_use]
    pub const fn default_base_price(mut self, price: Option<f64>) -> Self {
        self.cfg.default_base_price = price;
        self
    }

    /// Fix the synthetic generator's seed.
    #[must_use]
    pub const fn synthetic_seed(mut self, seed: u64) -> Self {
        self.cfg.synthetic_seed = Some(seed);
        self
    }

    /// Also cache stub and synthetic results.
    #[must_use]
    pub const fn cache_degraded(mut self, yes: bool) -> Self {
        self.cfg.cache_degraded = yes;
        self
    }

    /// Maximum number of news items requested per symbol.
    #[must_use]
    pub const fn news_limit(mut self, limit: usize) -> Self {
        self.cfg.news_limit = limit;
        self
    }

    /// Receive an [`AttemptEvent`] for every adapter attempt.
    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn AttemptObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the `Cascata` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidInput` if no connectors have been registered or the
    /// retry policy allows zero attempts.
    pub fn build(mut self) -> Result<Cascata, CascataError> {
        if self.connectors.is_empty() {
            return Err(CascataError::invalid_input(
                "no connectors registered; add at least one via with_connector(...)",
            ));
        }
        if self.cfg.retry.max_attempts == 0 {
            return Err(CascataError::invalid_input("retry.max_attempts must be >= 1"));
        }

        // Drop priority keys that name no registered connector, and duplicates.
        let known: HashSet<&'static str> = self.connectors.iter().map(|c| c.name()).collect();
        for keys in self.cfg.per_kind_priority.values_mut() {
            let mut seen: HashSet<&'static str> = HashSet::new();
            keys.retain(|k| {
                let n = k.as_str();
                known.contains(n) && seen.insert(n)
            });
        }

        let cache: Arc<dyn CacheStore> = match self.cache {
            Some(store) => store,
            None => Arc::new(FileCacheStore::new(self.cfg.cache_dir.clone())),
        };

        Ok(Cascata {
            connectors: self.connectors,
            synthetic: SyntheticGenerator::with_seed(self.cfg.synthetic_seed),
            cfg: self.cfg,
            cache,
            observer: self.observer,
        })
    }
}

/// Wrap errors that do not name a provider so the exhaustion report says
/// which adapter raised them.
pub(crate) fn tag_err(connector: &str, e: CascataError) -> CascataError {
    match e {
        e @ (CascataError::ProviderUnavailable { .. }
        | CascataError::ProviderRejected { .. }
        | CascataError::MalformedResponse { .. }) => e,
        other => CascataError::rejected(connector, other.to_string()),
    }
}

impl Cascata {
    /// Start building a new `Cascata` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use cascata::{Cascata, DataKind};
    /// use cascata_mock::MockConnector;
    ///
    /// let primary = Arc::new(MockConnector::new().named("primary"));
    /// let cascata = Cascata::builder()
    ///     .with_connector(primary)
    ///     .cache_dir("data/cache")
    ///     .build()?;
    /// let record = cascata.analyze("ACME", "1mo").await?;
    /// ```
    #[must_use]
    pub fn builder() -> CascataBuilder {
        CascataBuilder::new()
    }

    /// Effective configuration after build-time validation.
    #[must_use]
    pub const fn config(&self) -> &CascataConfig {
        &self.cfg
    }

    /// Shared cache store.
    #[must_use]
    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// Connectors in cascade order for `kind`, capable or not.
    pub(crate) fn ordered_for(&self, kind: DataKind) -> Vec<Arc<dyn CascataConnector>> {
        let mut out: Vec<(usize, Arc<dyn CascataConnector>)> =
            self.connectors.iter().cloned().enumerate().collect();
        if let Some(pref) = self.cfg.per_kind_priority.get(&kind) {
            let pos: HashMap<_, _> = pref
                .iter()
                .enumerate()
                .map(|(i, n)| (n.as_str(), i))
                .collect();
            out.sort_by_key(|(orig_i, c)| {
                (pos.get(c.name()).copied().unwrap_or(usize::MAX), *orig_i)
            });
        }
        out.into_iter().map(|(_, c)| c).collect()
    }

    fn emit(&self, event: &AttemptEvent) {
        if event.is_ok() {
            tracing::info!(
                symbol = %event.symbol,
                kind = %event.kind,
                adapter = event.adapter,
                attempt = event.attempt,
                outcome = event.outcome,
                latency_ms = event.latency_ms,
                "adapter attempt"
            );
        } else {
            tracing::warn!(
                symbol = %event.symbol,
                kind = %event.kind,
                adapter = event.adapter,
                attempt = event.attempt,
                outcome = event.outcome,
                latency_ms = event.latency_ms,
                error = event.error.as_deref().unwrap_or_default(),
                "adapter attempt"
            );
        }
        if let Some(obs) = &self.observer {
            obs.on_attempt(event);
        }
    }

    /// Walk the connectors for `kind` in order until one succeeds.
    ///
    /// Each connector gets up to `retry.max_attempts` attempts; only
    /// transient failures are retried, after `backoff_base * attempt`. Every
    /// attempt is bounded by the provider timeout, and an elapsed attempt is
    /// transient.
    ///
    /// Returns the payload with the name of the connector that produced it.
    #[tracing::instrument(
        name = "cascata::core::cascade",
        skip_all,
        fields(symbol = %symbol, kind = %kind),
    )]
    pub(crate) async fn cascade<T, F, Fut>(
        &self,
        symbol: &Symbol,
        kind: DataKind,
        call: F,
    ) -> Result<(T, &'static str), CascataError>
    where
        T: Send,
        F: Fn(Arc<dyn CascataConnector>) -> Option<Fut> + Send + Sync,
        Fut: core::future::Future<Output = Result<T, CascataError>> + Send,
    {
        let retry = self.cfg.retry;
        let timeout = self.cfg.provider_timeout;
        let mut attempted_any = false;
        let mut errors: Vec<CascataError> = Vec::new();

        for c in self.ordered_for(kind) {
            if !c.supports(kind) {
                continue;
            }
            let name = c.name();
            let mut attempt: u32 = 0;
            loop {
                let Some(fut) = call(Arc::clone(&c)) else {
                    break;
                };
                attempted_any = true;
                attempt += 1;

                let started = Instant::now();
                let (res, timed_out) = match tokio::time::timeout(timeout, fut).await {
                    Ok(r) => (r.map_err(|e| tag_err(name, e)), false),
                    Err(_) => (Err(CascataError::provider_timeout(name, timeout)), true),
                };
                let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

                let outcome = match &res {
                    Ok(_) => "ok",
                    Err(_) if timed_out => "timeout",
                    Err(e) => e.outcome_label(),
                };
                self.emit(&AttemptEvent {
                    symbol: symbol.clone(),
                    kind,
                    adapter: name,
                    attempt,
                    outcome,
                    latency_ms,
                    error: res.as_ref().err().map(ToString::to_string),
                });

                match res {
                    Ok(v) => return Ok((v, name)),
                    Err(e) if e.is_transient() && attempt < retry.max_attempts => {
                        tokio::time::sleep(retry.delay_after(attempt)).await;
                    }
                    Err(e) => {
                        errors.push(e);
                        break;
                    }
                }
            }
        }

        if !attempted_any {
            return Err(CascataError::unsupported(kind.as_str()));
        }
        Err(CascataError::AllSourcesExhausted { kind, errors })
    }
}
