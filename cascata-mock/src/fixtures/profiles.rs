use cascata_core::{CompanyProfile, Provenance, Symbol};

struct Row {
    name: &'static str,
    sector: &'static str,
    industry: &'static str,
    website: &'static str,
    market_cap: f64,
    pe: Option<f64>,
    dividend_yield: Option<f64>,
    range: (f64, f64),
    price: f64,
}

fn row(symbol: &str) -> Option<Row> {
    match symbol {
        "AAPL" => Some(Row {
            name: "Apple Inc.",
            sector: "Technology",
            industry: "Consumer Electronics",
            website: "https://www.apple.com",
            market_cap: 2.95e12,
            pe: Some(29.4),
            dividend_yield: Some(0.0052),
            range: (164.08, 199.62),
            price: 192.53,
        }),
        "MSFT" => Some(Row {
            name: "Microsoft Corporation",
            sector: "Technology",
            industry: "Software - Infrastructure",
            website: "https://www.microsoft.com",
            market_cap: 3.05e12,
            pe: Some(36.1),
            dividend_yield: Some(0.0073),
            range: (309.45, 430.82),
            price: 411.22,
        }),
        "GOOG" => Some(Row {
            name: "Alphabet Inc.",
            sector: "Communication Services",
            industry: "Internet Content & Information",
            website: "https://abc.xyz",
            market_cap: 2.05e12,
            pe: Some(25.8),
            dividend_yield: None,
            range: (120.21, 174.71),
            price: 166.01,
        }),
        "ACME" => Some(Row {
            name: "Acme Corporation",
            sector: "Industrials",
            industry: "Specialty Industrial Machinery",
            website: "https://acme.example",
            market_cap: 4.2e9,
            pe: None,
            dividend_yield: Some(0.021),
            range: (35.0, 48.5),
            price: 42.5,
        }),
        _ => None,
    }
}

pub fn by_symbol(symbol: &Symbol, source: &str) -> Option<CompanyProfile> {
    let r = row(symbol.as_str())?;
    Some(CompanyProfile {
        short_name: Some(symbol.as_str().to_string()),
        long_name: Some(r.name.to_string()),
        sector: Some(r.sector.to_string()),
        industry: Some(r.industry.to_string()),
        website: Some(r.website.to_string()),
        market_cap: Some(r.market_cap),
        trailing_pe: r.pe,
        dividend_yield: r.dividend_yield,
        fifty_two_week_low: Some(r.range.0),
        fifty_two_week_high: Some(r.range.1),
        current_price: Some(r.price),
        exchange: Some("NASDAQ".to_string()),
        currency: Some("USD".to_string()),
        country: Some("United States".to_string()),
        ..CompanyProfile::empty(symbol.clone(), Provenance::provider(source))
    })
}
