use cascata_cache::CacheKey;
use cascata_core::{CascataError, CompanyProfile, DataKind, FetchResult, Provenance, Symbol};

use crate::Cascata;
use crate::cascata_router_method;
use crate::router::util::collapse_errors;

impl Cascata {
    cascata_router_method! {
        method: profile_cascade() -> CompanyProfile,
        kind: DataKind::Profile,
        accessor: as_profile_provider,
        call: profile()
    }

    /// Fetch the company profile for `symbol`.
    ///
    /// Never fails once the symbol is valid: when every profile connector
    /// fails, the result is a stub carrying only the symbol as its name,
    /// tagged `fallback`.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a malformed symbol.
    #[tracing::instrument(target = "cascata::router", skip(self))]
    pub async fn profile(&self, symbol: &str) -> Result<FetchResult<CompanyProfile>, CascataError> {
        let symbol = Symbol::new(symbol)?;
        Ok(self.profile_for(&symbol).await)
    }

    pub(crate) async fn profile_for(&self, symbol: &Symbol) -> FetchResult<CompanyProfile> {
        let key = CacheKey::for_kind(symbol, DataKind::Profile);
        match self.profile_cascade(symbol, key.clone()).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %collapse_errors(&e), "profile sources exhausted; using stub");
                let result = FetchResult::ok(CompanyProfile::stub(symbol.clone()), Provenance::Fallback);
                self.store_result(key, &result).await;
                result
            }
        }
    }
}
