use std::time::Duration;

use cascata_core::CascataError;
use cascata_core::http::{Client, HttpConfig};

use crate::YahooConnector;

/// Builder for [`YahooConnector`].
#[derive(Debug, Clone)]
pub struct YahooBuilder {
    http: HttpConfig,
}

impl Default for YahooBuilder {
    fn default() -> Self {
        Self {
            http: HttpConfig::new(YahooConnector::DEFAULT_BASE_URL),
        }
    }
}

impl YahooBuilder {
    /// Override the API host.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.http.base_url = url.into();
        self
    }

    /// Override the user agent. Yahoo rejects many non-browser agents.
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

    /// Reuse an existing `reqwest::Client`, e.g. one with a cookie store.
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
    pub fn build(self) -> Result<YahooConnector, CascataError> {
        let (client, base_url) = self.http.into_parts()?;
        Ok(YahooConnector { client, base_url })
    }
}
