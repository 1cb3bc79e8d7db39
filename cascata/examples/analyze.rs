//! Fetch a full record for one symbol and ask a local model for a recommendation.
//!
//! ```text
//! cargo run -p cascata --example analyze -- AAPL 6mo
//! ```
//!
//! Set `CASCATA_EXAMPLES_USE_MOCK=1` to run against fixtures only.
use std::sync::Arc;

use cascata::analysis::{Analyst, LocalSummarizer, OllamaSummarizer};
use cascata::{Cascata, DataKind, ProviderCredentials};
use cascata_alphavantage::AlphaVantageConnector;
use cascata_fmp::FmpConnector;
use cascata_marketwatch::MarketWatchConnector;
use cascata_mock::MockConnector;
use cascata_yahoo::YahooConnector;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .try_init();

    let mut args = std::env::args().skip(1);
    let symbol = args.next().unwrap_or_else(|| "AAPL".to_string());
    let period = args.next().unwrap_or_else(|| "1y".to_string());
    let creds = ProviderCredentials::from_env();

    let mut builder = Cascata::builder();
    if std::env::var("CASCATA_EXAMPLES_USE_MOCK").is_err() {
        builder = builder
            .with_connector(Arc::new(
                AlphaVantageConnector::builder()
                    .maybe_api_key(creds.alpha_vantage_key.clone())
                    .build()?,
            ))
            .with_connector(Arc::new(YahooConnector::builder().build()?))
            .with_connector(Arc::new(MarketWatchConnector::builder().build()?));
        if let Some(key) = &creds.fmp_key {
            builder = builder.with_connector(Arc::new(FmpConnector::builder().api_key(key).build()?));
        }
        builder = builder.prefer_for_kind(
            DataKind::Profile,
            &[FmpConnector::KEY, AlphaVantageConnector::KEY, YahooConnector::KEY],
        );
    }
    let cascata = builder
        .with_connector(Arc::new(MockConnector::new()))
        .cache_dir("data/cache")
        .build()?;

    let record = cascata.analyze(&symbol, &period).await?;
    let provenance = record.provenance();
    println!("{} over {}", record.symbol, record.period.description());
    println!("  price history: {} points from {}", record.prices().len(), provenance.price_history);
    println!("  profile:       {}", provenance.profile);
    println!("  news:          {} items from {}", record.news_items().len(), provenance.news);
    println!("  fundamentals:  {}", provenance.fundamentals);

    let analyst = Analyst::new(Arc::new(OllamaSummarizer::from_credentials(&creds)?))
        .with_fallback(Arc::new(LocalSummarizer));
    let rec = analyst.recommend(&record).await;
    println!("\nRECOMMENDATION: {} (Confidence: {})", rec.action, rec.confidence);
    if !rec.analysis.is_empty() {
        println!("\n{}", rec.analysis);
    }
    Ok(())
}
