use cascata_cache::CacheKey;
use cascata_core::{CascataError, DataKind, FetchResult, FundamentalsBundle, Symbol};

use crate::Cascata;
use crate::cascata_router_method;
use crate::router::util::{collapse_errors, fallback_failure};

impl Cascata {
    cascata_router_method! {
        method: fundamentals_cascade() -> FundamentalsBundle,
        kind: DataKind::Fundamentals,
        accessor: as_fundamentals_provider,
        call: fundamentals()
    }

    /// Fetch income, balance sheet, cash flow and earnings statements.
    ///
    /// The bundle always comes from a single connector. Exhaustion yields a
    /// failed envelope tagged `fallback`.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a malformed symbol.
    #[tracing::instrument(target = "cascata::router", skip(self))]
    pub async fn fundamentals(
        &self,
        symbol: &str,
    ) -> Result<FetchResult<FundamentalsBundle>, CascataError> {
        let symbol = Symbol::new(symbol)?;
        Ok(self.fundamentals_for(&symbol).await)
    }

    pub(crate) async fn fundamentals_for(&self, symbol: &Symbol) -> FetchResult<FundamentalsBundle> {
        let key = CacheKey::for_kind(symbol, DataKind::Fundamentals);
        match self.fundamentals_cascade(symbol, key).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %collapse_errors(&e), "fundamentals sources exhausted");
                fallback_failure(&e)
            }
        }
    }
}
