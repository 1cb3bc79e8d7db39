//! cascata-marketwatch
//!
//! Last-resort profile connector that scrapes the public MarketWatch quote
//! page. It yields a name, the intraday price, and whatever key statistics
//! the page shows.
#![warn(missing_docs)]

mod page;

use std::time::Duration;

use async_trait::async_trait;
use cascata_core::connector::{CascataConnector, ConnectorKey, ProfileProvider};
use cascata_core::http::{self, Client, HttpConfig};
use cascata_core::{CascataError, CompanyProfile, Symbol};

const NAME: &str = "marketwatch";

/// MarketWatch connector. Construct with [`MarketWatchConnector::builder`].
#[derive(Debug, Clone)]
pub struct MarketWatchConnector {
    client: Client,
    base_url: String,
}

impl MarketWatchConnector {
    /// Static connector key for priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new(NAME);

    /// Production site.
    pub const DEFAULT_BASE_URL: &'static str = "https://www.marketwatch.com";

    /// Start a builder with production defaults.
    #[must_use]
    pub fn builder() -> MarketWatchBuilder {
        MarketWatchBuilder {
            http: HttpConfig::new(Self::DEFAULT_BASE_URL),
        }
    }
}

/// Builder for [`MarketWatchConnector`].
#[derive(Debug, Clone)]
pub struct MarketWatchBuilder {
    http: HttpConfig,
}

impl MarketWatchBuilder {
    /// Override the site root.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.http.base_url = url.into();
        self
    }

    /// Override the browser user agent.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.http.user_agent = ua.into();
        self
    }

    /// Per-request HTTP timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = timeout;
        self
    }

    /// Reuse an existing `reqwest::Client`.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.http.client = Some(client);
        self
    }

    /// Build the connector.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the base URL does not parse or the HTTP
    /// client cannot be created.
    pub fn build(self) -> Result<MarketWatchConnector, CascataError> {
        let (client, base_url) = self.http.into_parts()?;
        Ok(MarketWatchConnector { client, base_url })
    }
}

#[async_trait]
impl ProfileProvider for MarketWatchConnector {
    async fn profile(&self, symbol: &Symbol) -> Result<CompanyProfile, CascataError> {
        let path = format!("investing/stock/{}", symbol.as_str().to_ascii_lowercase());
        let url = http::build_url(&self.base_url, &path, &[])?;
        let body = http::get_text(&self.client, NAME, url).await?;
        page::parse_page(&body, symbol)
    }
}

impl CascataConnector for MarketWatchConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn vendor(&self) -> &'static str {
        "MarketWatch"
    }

    fn as_profile_provider(&self) -> Option<&dyn ProfileProvider> {
        Some(self as &dyn ProfileProvider)
    }
}
