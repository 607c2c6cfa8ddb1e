//! OpenAI-compatible chat completions client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use super::{ReasoningRequest, ReasoningService, response_text};
use crate::errors::ReasoningError;
use crate::util::truncate_chars;

/// Reasoning backend speaking the `/chat/completions` protocol.
///
/// Works against OpenAI and any compatible server (vLLM, Ollama, LM Studio).
pub struct HttpReasoner {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpReasoner {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ReasoningError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReasoningError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        })
    }

    fn map_status(status: reqwest::StatusCode, body: &str) -> ReasoningError {
        match status.as_u16() {
            401 | 403 => ReasoningError::Unauthorized,
            429 => ReasoningError::Throttled,
            code => ReasoningError::Status {
                status: code,
                body: truncate_chars(body, 200).to_string(),
            },
        }
    }
}

#[async_trait]
impl ReasoningService for HttpReasoner {
    async fn complete(&self, request: ReasoningRequest) -> Result<String, ReasoningError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system_prompt},
                {"role": "user", "content": request.prompt},
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": false,
        });

        debug!(url = %url, model = %self.model, stage = %request.stage, "Sending completion request");

        let mut builder = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ReasoningError::Timeout
            } else {
                ReasoningError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ReasoningError::Timeout
            } else {
                ReasoningError::Transport(format!("Failed to read response body: {}", e))
            }
        })?;

        if !status.is_success() {
            return Err(Self::map_status(status, &text));
        }

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| ReasoningError::Decode(format!("Invalid JSON: {}", e)))?;
        Ok(response_text(&value))
    }

    fn name(&self) -> &str {
        &self.model
    }
}
