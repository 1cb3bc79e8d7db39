use cascata_core::NewsItem;
use chrono::{DateTime, Utc};

fn at(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn item(title: &str, publisher: &str, ts: i64, sentiment: &str, relevance: f64) -> NewsItem {
    let slug: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    NewsItem {
        title: title.to_string(),
        publisher: Some(publisher.to_string()),
        link: Some(format!("https://news.example/{slug}")),
        published_at: at(ts),
        summary: None,
        sentiment_label: Some(sentiment.to_string()),
        relevance: Some(relevance),
    }
}

/// Items are ordered by relevance, highest first.
pub fn by_symbol(symbol: &str) -> Option<Vec<NewsItem>> {
    match symbol {
        "AAPL" => Some(vec![
            item("Apple unveils new silicon", "Reuters", 1_717_430_400, "Bullish", 0.93),
            item("iPhone shipments steady in Q2", "Bloomberg", 1_717_344_000, "Neutral", 0.81),
            item("Services revenue hits record", "CNBC", 1_717_257_600, "Somewhat-Bullish", 0.74),
            item("Regulators examine app store fees", "FT", 1_717_171_200, "Somewhat-Bearish", 0.66),
        ]),
        "MSFT" => Some(vec![
            item("Azure growth beats estimates", "Reuters", 1_717_430_400, "Bullish", 0.91),
            item("Copilot adoption widens", "The Verge", 1_717_344_000, "Somewhat-Bullish", 0.72),
        ]),
        "GOOG" => Some(vec![item(
            "Search ad revenue climbs",
            "WSJ",
            1_717_430_400,
            "Somewhat-Bullish",
            0.88,
        )]),
        "ACME" => Some(vec![
            item("Acme wins rail contract", "Trade Weekly", 1_717_430_400, "Bullish", 0.97),
            item("Acme guides flat margins", "Industry Wire", 1_717_344_000, "Neutral", 0.64),
            item("Acme opens plant in Ohio", "Local Ledger", 1_717_257_600, "Somewhat-Bullish", 0.58),
        ]),
        _ => None,
    }
}
