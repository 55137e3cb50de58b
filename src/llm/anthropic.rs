//! HTTP client for the Anthropic Messages API.

use std::time::Duration;

use async_trait::async_trait;

use super::{LlmClient, MessageRequest, MessageResponse};
use crate::config::Config;

const API_VERSION: &str = "2023-06-01";
const MESSAGES_PATH: &str = "v1/messages";

/// Messages API client.
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: url::Url,
}

impl AnthropicClient {
    /// Create a client for `base_url` (e.g. `https://api.anthropic.com`).
    pub fn new(api_key: String, base_url: &url::Url, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tool_rounds/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            api_key,
            endpoint: messages_endpoint(base_url)?,
        })
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(config.api_key.clone(), &config.base_url, config.request_timeout)
    }
}

/// Join the messages path onto the base URL, keeping any path prefix.
fn messages_endpoint(base_url: &url::Url) -> anyhow::Result<url::Url> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(MESSAGES_PATH)?)
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn create_message(&self, request: &MessageRequest) -> anyhow::Result<MessageResponse> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "Sending request to Messages API"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Messages API request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Messages API returned an error status");
            return Err(anyhow::anyhow!("Messages API error {}: {}", status, body));
        }

        let parsed: MessageResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Malformed Messages API response: {}", e))?;

        tracing::debug!(
            stop_reason = %parsed.stop_reason,
            blocks = parsed.content.len(),
            "Received response from Messages API"
        );

        Ok(parsed)
    }
}
