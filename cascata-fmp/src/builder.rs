use std::time::Duration;

use cascata_core::CascataError;
use cascata_core::http::{Client, HttpConfig};

use crate::FmpConnector;

/// Builder for [`FmpConnector`].
#[derive(Debug, Clone)]
pub struct FmpBuilder {
    api_key: Option<String>,
    http: HttpConfig,
}

impl Default for FmpBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            http: HttpConfig::new(FmpConnector::DEFAULT_BASE_URL),
        }
    }
}

impl FmpBuilder {
    /// API key; defaults to `demo`.
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

    /// Override the API host.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.http.base_url = url.into();
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
    pub fn build(self) -> Result<FmpConnector, CascataError> {
        let (client, base_url) = self.http.into_parts()?;
        Ok(FmpConnector {
            client,
            base_url,
            api_key: self.api_key.unwrap_or_else(|| "demo".to_string()),
        })
    }
}
