use std::time::Duration;

use reqwest::{Client as ReqwestClient, Response};
use tracing::{debug, info, instrument, warn};

use super::errors::ClaudeApiError;
use super::types::{MessageRequest, MessageResponse};
use crate::domain::models::{Credential, LlmConfig};

/// Configuration for the Claude HTTP client
#[derive(Debug, Clone)]
pub struct ClaudeClientConfig {
    /// Base URL for the Claude API
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClaudeClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            timeout_secs: 120,
        }
    }
}

impl From<&LlmConfig> for ClaudeClientConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// HTTP client for the Claude Messages API.
///
/// The API key is passed with every call rather than baked into default
/// headers, so one client serves requests carrying different keys.
#[derive(Debug, Clone)]
pub struct ClaudeClient {
    http_client: ReqwestClient,
    base_url: String,
}

impl ClaudeClient {
    /// Build the HTTP client; no request is made.
    pub fn new(config: ClaudeClientConfig) -> Result<Self, ClaudeApiError> {
        info!(
            base_url = %config.base_url,
            timeout_secs = config.timeout_secs,
            "Initializing Claude API client"
        );

        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(4)
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send a message to Claude and get a response
    #[instrument(skip(self, api_key, request), fields(model = %request.model, max_tokens = request.max_tokens))]
    pub async fn send_message(
        &self,
        api_key: &Credential,
        request: &MessageRequest,
    ) -> Result<MessageResponse, ClaudeApiError> {
        let url = format!("{}/v1/messages", self.base_url);
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", api_key.expose())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let message = Self::handle_response(response).await?;
        info!(
            input_tokens = message.usage.input_tokens,
            output_tokens = message.usage.output_tokens,
            "Message request succeeded"
        );
        Ok(message)
    }

    async fn handle_response(response: Response) -> Result<MessageResponse, ClaudeApiError> {
        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("API error ({}): {}", status, body);
            return Err(ClaudeApiError::from_response(status, &body));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
