//! Shared `reqwest` plumbing for HTTP connectors.

use std::time::Duration;

use cascata_types::CascataError;
pub use reqwest::Client;
pub use url::Url;

use crate::parse::check_status;

/// Per-request timeout applied by [`default_client`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Browser-like user agent; several providers refuse library defaults.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Build a client with `timeout` and `user_agent`.
///
/// # Errors
/// Returns `InvalidInput` if the TLS backend cannot be initialized.
pub fn default_client(user_agent: &str, timeout: Duration) -> Result<Client, CascataError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| CascataError::invalid_input(format!("http client: {e}")))
}

/// Endpoint and client settings shared by the connector builders.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL requests are joined onto.
    pub base_url: String,
    /// User agent for a client built here.
    pub user_agent: String,
    /// Per-request timeout for a client built here.
    pub timeout: Duration,
    /// Caller-supplied client; overrides `user_agent` and `timeout`.
    pub client: Option<Client>,
}

impl HttpConfig {
    /// Defaults pointed at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            client: None,
        }
    }

    /// Validate the base URL and produce the client.
    ///
    /// # Errors
    /// Returns `InvalidInput` for an unparseable base URL or client failure.
    pub fn into_parts(self) -> Result<(Client, String), CascataError> {
        build_url(&self.base_url, "", &[])?;
        let client = match self.client {
            Some(c) => c,
            None => default_client(&self.user_agent, self.timeout)?,
        };
        Ok((client, self.base_url))
    }
}

/// Classify a transport-level failure. All of them are transient.
#[must_use]
pub fn transport_error(connector: &str, e: &reqwest::Error) -> CascataError {
    if e.is_timeout() {
        CascataError::unavailable(connector, format!("request timed out: {e}"))
    } else if e.is_connect() {
        CascataError::unavailable(connector, format!("connection failed: {e}"))
    } else {
        CascataError::unavailable(connector, format!("request failed: {e}"))
    }
}

/// Join `path` onto `base` and append `params` as the query string.
///
/// # Errors
/// Returns `InvalidInput` when `base` is not a valid URL.
pub fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url, CascataError> {
    let joined = if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    };
    let url = if params.is_empty() {
        Url::parse(&joined)
    } else {
        Url::parse_with_params(&joined, params)
    };
    url.map_err(|e| CascataError::invalid_input(format!("bad url {joined}: {e}")))
}

/// GET `url`, classify the status, and return the body.
///
/// # Errors
/// Transport failures, 429 and 5xx are `ProviderUnavailable`; other non-2xx
/// statuses are `ProviderRejected`.
pub async fn get_text(client: &Client, connector: &str, url: Url) -> Result<String, CascataError> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| transport_error(connector, &e))?;
    check_status(connector, resp.status().as_u16())?;
    resp.text().await.map_err(|e| transport_error(connector, &e))
}
