use std::time::Duration;

use async_trait::async_trait;
use cascata_core::http::{self, Client, HttpConfig};
use cascata_core::parse::{check_status, parse_json, top_level_keys};
use cascata_core::{CascataError, ProviderCredentials};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-text generator fed with the prompt built from a record.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce an analysis for `prompt` under `system_prompt`.
    async fn summarize(&self, prompt: &str, system_prompt: &str) -> Result<String, CascataError>;
}

const NAME: &str = "ollama";

/// Summarizer backed by an Ollama-compatible `/api/chat` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaSummarizer {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: String,
}

impl OllamaSummarizer {
    /// Local server address.
    pub const DEFAULT_HOST: &'static str = "http://127.0.0.1:11434";
    /// Model used when none is configured.
    pub const DEFAULT_MODEL: &'static str = "deepseek-r1:8b";

    /// Start a builder pointed at the local server.
    #[must_use]
    pub fn builder() -> OllamaBuilder {
        OllamaBuilder {
            http: HttpConfig::new(Self::DEFAULT_HOST),
            model: Self::DEFAULT_MODEL.to_string(),
        }
    }

    /// Configure host and model from [`ProviderCredentials`].
    ///
    /// # Errors
    /// Returns `InvalidInput` if the configured host is not a valid URL.
    pub fn from_credentials(creds: &ProviderCredentials) -> Result<Self, CascataError> {
        let mut b = Self::builder();
        if let Some(host) = &creds.ollama_host {
            b = b.host(host.clone());
        }
        if let Some(model) = &creds.ollama_model {
            b = b.model(model.clone());
        }
        b.build()
    }

    /// Model name sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Builder for [`OllamaSummarizer`].
#[derive(Debug, Clone)]
pub struct OllamaBuilder {
    http: HttpConfig,
    model: String,
}

impl OllamaBuilder {
    /// Server root, e.g. `http://127.0.0.1:11434`.
    #[must_use]
    pub fn host(mut self, url: impl Into<String>) -> Self {
        self.http.base_url = url.into();
        self
    }

    /// Model name.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Per-request HTTP timeout; generation can be slow.
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

    /// Build the summarizer.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the host does not parse or the HTTP client
    /// cannot be created.
    pub fn build(self) -> Result<OllamaSummarizer, CascataError> {
        let (client, base_url) = self.http.into_parts()?;
        Ok(OllamaSummarizer {
            client,
            base_url,
            model: self.model,
        })
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&self, prompt: &str, system_prompt: &str) -> Result<String, CascataError> {
        let url = http::build_url(&self.base_url, "api/chat", &[])?;
        let mut messages = Vec::with_capacity(2);
        if !system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });
        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        let resp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| http::transport_error(NAME, &e))?;
        check_status(NAME, resp.status().as_u16())?;
        let text = resp
            .text()
            .await
            .map_err(|e| http::transport_error(NAME, &e))?;

        let value: Value = parse_json(NAME, &text)?;
        let reply: ChatResponse = serde_json::from_value(value.clone()).map_err(|e| {
            CascataError::malformed(NAME, format!("no chat message: {e}"), top_level_keys(&value))
        })?;
        Ok(reply.message.content)
    }
}
