use cascata_cache::CacheKey;
use cascata_core::{
    CascataError, CompanyProfile, DataKind, FetchResult, Period, PricePoint, Provenance, Symbol,
};
use chrono::Utc;

use crate::Cascata;
use crate::cascata_router_method;
use crate::router::util::resolve_period;

impl Cascata {
    cascata_router_method! {
        /// Cached price cascade for one period; exhaustion is returned as-is.
        method: price_cascade(period: Period) -> Vec<PricePoint>,
        kind: DataKind::Price,
        accessor: as_price_history_provider,
        call: price_history(period)
    }

    /// Fetch daily price history for `symbol` over `period`.
    ///
    /// Unknown period codes are replaced with `1y`. When every price
    /// connector fails, a synthetic series is generated from the profile's
    /// reference price (fetched through the profile cascade) or the
    /// configured default.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a malformed symbol, and
    /// `AllSourcesExhausted { kind: price }` when every connector failed and
    /// no synthetic series can be produced.
    #[tracing::instrument(target = "cascata::router", skip(self))]
    pub async fn price_history(
        &self,
        symbol: &str,
        period: &str,
    ) -> Result<FetchResult<Vec<PricePoint>>, CascataError> {
        let symbol = Symbol::new(symbol)?;
        let period = resolve_period(period);
        match self.prices_for(&symbol, period).await {
            Ok(r) => Ok(r),
            Err(e) => {
                let profile = self.profile_for(&symbol).await;
                self.synthesize(&symbol, period, profile.payload(), e).await
            }
        }
    }

    pub(crate) async fn prices_for(
        &self,
        symbol: &Symbol,
        period: Period,
    ) -> Result<FetchResult<Vec<PricePoint>>, CascataError> {
        self.price_cascade(symbol, CacheKey::price(symbol, period), period)
            .await
    }

    /// Last-resort price series once every real connector has failed.
    pub(crate) async fn synthesize(
        &self,
        symbol: &Symbol,
        period: Period,
        profile: Option<&CompanyProfile>,
        cause: CascataError,
    ) -> Result<FetchResult<Vec<PricePoint>>, CascataError> {
        let cause = match cause {
            e @ CascataError::AllSourcesExhausted { .. } => e,
            other => CascataError::AllSourcesExhausted {
                kind: DataKind::Price,
                errors: vec![other],
            },
        };
        if !self.cfg.synthetic_fallback {
            return Err(cause);
        }
        let Some(base) = profile
            .and_then(CompanyProfile::reference_price)
            .or(self.cfg.default_base_price)
        else {
            tracing::warn!(symbol = %symbol, "no base price for synthetic series");
            return Err(cause);
        };

        tracing::warn!(
            symbol = %symbol,
            period = %period,
            base_price = base,
            error = %cause,
            "price sources exhausted; generating synthetic series"
        );
        let series = self
            .synthetic
            .series(base, period, Utc::now().date_naive());
        let result = FetchResult::ok(series, Provenance::Synthetic);
        self.store_result(CacheKey::price(symbol, period), &result)
            .await;
        Ok(result)
    }
}
