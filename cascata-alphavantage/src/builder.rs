use std::time::Duration;

use cascata_core::CascataError;
use cascata_core::http::{Client, HttpConfig};

use crate::AlphaVantageConnector;

/// Builder for [`AlphaVantageConnector`].
#[derive(Debug, Clone)]
pub struct AlphaVantageBuilder {
    api_key: Option<String>,
    http: HttpConfig,
}

impl Default for AlphaVantageBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            http: HttpConfig::new(AlphaVantageConnector::DEFAULT_BASE_URL),
        }
    }
}

impl AlphaVantageBuilder {
    /// API key sent as `apikey`. Falls back to Alpha Vantage's `demo` key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the key only when one is available.
    #[must_use]
    pub fn maybe_api_key(mut self, key: Option<String>) -> Self {
        if key.is_some() {
            self.api_key = key;
        }
        self
    }

    /// Override the query endpoint (tests point this at a local mock server).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.http.base_url = url.into();
        self
    }

    /// Override the user agent.
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

    /// Reuse an existing `reqwest::Client`; timeout and user agent are then ignored.
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
    pub fn build(self) -> Result<AlphaVantageConnector, CascataError> {
        let (client, base_url) = self.http.into_parts()?;
        Ok(AlphaVantageConnector {
            client,
            base_url,
            api_key: self.api_key.unwrap_or_else(|| "demo".to_string()),
        })
    }
}
