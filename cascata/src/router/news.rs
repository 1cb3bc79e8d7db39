use cascata_cache::CacheKey;
use cascata_core::{CascataError, DataKind, FetchResult, NewsItem, Symbol};

use crate::Cascata;
use crate::cascata_router_method;
use crate::router::util::{collapse_errors, fallback_failure};

impl Cascata {
    cascata_router_method! {
        method: news_cascade(limit: usize) -> Vec<NewsItem>,
        kind: DataKind::News,
        accessor: as_news_provider,
        call: news(limit)
    }

    /// Fetch up to `news_limit` recent news items for `symbol`.
    ///
    /// Exhaustion is not an error: the result is a failed envelope tagged
    /// `fallback`, and the record exposes an empty list.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a malformed symbol.
    #[tracing::instrument(target = "cascata::router", skip(self))]
    pub async fn news(&self, symbol: &str) -> Result<FetchResult<Vec<NewsItem>>, CascataError> {
        let symbol = Symbol::new(symbol)?;
        Ok(self.news_for(&symbol).await)
    }

    pub(crate) async fn news_for(&self, symbol: &Symbol) -> FetchResult<Vec<NewsItem>> {
        let key = CacheKey::for_kind(symbol, DataKind::News);
        match self.news_cascade(symbol, key, self.cfg.news_limit).await {
            Ok(mut r) => {
                if let Some(items) = r.payload.as_mut() {
                    items.truncate(self.cfg.news_limit);
                }
                r
            }
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %collapse_errors(&e), "news sources exhausted");
                fallback_failure(&e)
            }
        }
    }
}
