use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::http_utils::{join_base_path, truncate_body};
use crate::types::{ChatCompletionResponse, ChatMessage, LlmConfig};

const ERROR_BODY_LIMIT: usize = 512;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("invalid API url: base_url is empty")]
    InvalidUrl,
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to the model API timed out")]
    Timeout,
    #[error("request to the model API failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("model API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("model API returned an unreadable body: {0}")]
    Decode(String),
    #[error("model API returned no message content")]
    EmptyResponse,
}

impl LlmError {
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            LlmError::Status { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }
}

/// Client for an OpenAI-compatible chat completion endpoint.
///
/// One call, one request: no streaming, no retry.
#[derive(Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http_client: Client,
    url: String,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let url = join_base_path(&config.base_url, &config.chat_path).ok_or(LlmError::InvalidUrl)?;
        let http_client = Client::builder()
            .redirect(Policy::none())
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!("govlens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(LlmError::Client)?;
        tracing::debug!(url = %url, model = %config.model, "llm client configured");
        Ok(Self {
            config,
            http_client,
            url,
        })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn complete(&self, api_key: &str, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let body = self.request_body(messages);
        let started = Instant::now();
        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(
                    is_timeout = err.is_timeout(),
                    is_connect = err.is_connect(),
                    error = %err,
                    "llm request failed"
                );
                if err.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Transport(err)
                }
            })?;
        let status = response.status();
        tracing::info!(
            status = %status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            model = %self.config.model,
            "llm response received"
        );

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status,
                body: truncate_body(&text, ERROR_BODY_LIMIT),
            });
        }

        let text = response.text().await.map_err(LlmError::Transport)?;
        extract_content(&text)
    }

    pub(crate) fn request_body(&self, messages: &[ChatMessage]) -> Value {
        json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "stream": false,
        })
    }
}

pub(crate) fn extract_content(body: &str) -> Result<String, LlmError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|err| LlmError::Decode(err.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(LlmError::EmptyResponse)
}
