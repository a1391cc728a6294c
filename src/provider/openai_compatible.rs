//! OpenAI-compatible HTTP completion client
//!
//! Works against any endpoint exposing the `/v1/chat/completions` shape
//! (OpenAI itself, Ollama, LM Studio, proxies). The client is thread-safe
//! and can be shared across tasks behind an `Arc`.

use super::{CompletionClient, ProviderError};
use crate::model::{Message, MessageRole};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_TOKENS: u32 = 4096;

pub struct OpenAiCompatibleClient {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    http_client: Client,
    timeout: Duration,
}

impl OpenAiCompatibleClient {
    pub fn new(endpoint: String, model: String, api_key: Option<String>) -> Self {
        Self::with_timeout(
            endpoint,
            model,
            api_key,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn with_timeout(
        endpoint: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            endpoint,
            model,
            api_key,
            http_client,
            timeout,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[Message],
    ) -> Result<String, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);

        let mut wire_messages = vec![WireMessage {
            role: "system".to_string(),
            content: system_prompt.to_string(),
        }];
        wire_messages.extend(messages.iter().map(|m| WireMessage {
            role: match m.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
                MessageRole::System => "system",
            }
            .to_string(),
            content: m.content.clone(),
        }));

        let request = ChatRequest {
            model: self.model.clone(),
            messages: wire_messages,
            temperature: Some(0.7),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            stream: Some(false),
        };

        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            history_len = messages.len(),
            "Sending completion request"
        );

        let start = Instant::now();
        let mut builder = self.http_client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                error!("Completion request timed out after {:?}", self.timeout);
                ProviderError::Timeout {
                    seconds: self.timeout.as_secs(),
                }
            } else {
                error!("Completion request failed: {}", e);
                ProviderError::Network {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ProviderError::Authentication {
                message: format!("provider rejected credentials (HTTP {})", status.as_u16()),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Provider returned HTTP {}: {}", status, body);
            return Err(ProviderError::Api {
                message: body,
                status_code: Some(status.as_u16()),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse {
                message: format!("JSON parse error: {}", e),
            }
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .map(|message| message.content)
            .ok_or_else(|| ProviderError::InvalidResponse {
                message: "no choices in provider response".to_string(),
            })?;

        info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Completion received"
        );

        Ok(content)
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }

    fn model_info(&self) -> Option<String> {
        Some(format!("{} @ {}", self.model, self.endpoint))
    }
}

impl fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: Option<WireMessage>,
}
