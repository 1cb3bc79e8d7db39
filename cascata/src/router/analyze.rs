use cascata_core::{CascataError, NormalizedRecord, Period, Symbol};

use crate::Cascata;
use crate::router::util::{resolve_period, with_request_deadline};

impl Cascata {
    /// Fetch every data kind for `symbol` and assemble a [`NormalizedRecord`].
    ///
    /// The four kinds are cascaded concurrently and fail independently:
    /// - price falls back to a synthetic series;
    /// - profile falls back to a stub;
    /// - news and fundamentals fall back to a failed, empty envelope.
    ///
    /// Unknown period codes are replaced with `1y` before any cache lookup.
    ///
    /// # Errors
    /// - `InvalidInput` for a malformed symbol; no connector is called.
    /// - `AllSourcesExhausted { kind: price }` when price data is
    ///   unavailable and no synthetic series can be generated.
    /// - `RequestTimeout` when the configured request deadline elapses.
    #[tracing::instrument(target = "cascata::router", skip(self))]
    pub async fn analyze(&self, symbol: &str, period: &str) -> Result<NormalizedRecord, CascataError> {
        let symbol = Symbol::new(symbol)?;
        let period = resolve_period(period);
        with_request_deadline(
            self.cfg.request_timeout,
            "analyze",
            self.assemble(symbol, period),
        )
        .await
    }

    async fn assemble(&self, symbol: Symbol, period: Period) -> Result<NormalizedRecord, CascataError> {
        let (price, profile, news, fundamentals) = tokio::join!(
            self.prices_for(&symbol, period),
            self.profile_for(&symbol),
            self.news_for(&symbol),
            self.fundamentals_for(&symbol),
        );

        let price_history = match price {
            Ok(r) => r,
            Err(e) => {
                self.synthesize(&symbol, period, profile.payload(), e)
                    .await?
            }
        };

        let record = NormalizedRecord {
            symbol,
            period,
            price_history,
            profile,
            news,
            fundamentals,
        };
        let provenance = record.provenance();
        tracing::info!(
            symbol = %record.symbol,
            period = %period,
            points = record.prices().len(),
            price = %provenance.price_history,
            profile = %provenance.profile,
            news = %provenance.news,
            fundamentals = %provenance.fundamentals,
            "record assembled"
        );
        Ok(record)
    }
}
