//! Chat-completions client

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{parse::parse_advice, AdvisoryError, AdvisoryService};

const DEFAULT_SYSTEM_PROMPT: &str = "You are a road-safety expert specializing in driver fatigue. \
Give concise, actionable recommendations, one per line, each under 50 words.";

/// Advisory endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Off unless explicitly enabled
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Bearer token
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    pub system_prompt: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://spark-api-open.xf-yun.com/v2".to_string(),
            api_key: None,
            model: "x1".to_string(),
            max_tokens: 150,
            temperature: 0.7,
            timeout_ms: 10_000,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl AdvisorConfig {
    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Advisory service backed by an HTTP chat-completions endpoint
#[derive(Debug, Clone)]
pub struct HttpAdvisor {
    config: AdvisorConfig,
    client: reqwest::Client,
}

impl HttpAdvisor {
    pub fn new(config: AdvisorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    fn map_transport_error(&self, err: reqwest::Error) -> AdvisoryError {
        if err.is_timeout() {
            AdvisoryError::Timeout(self.config.timeout_ms)
        } else {
            AdvisoryError::Network(err.to_string())
        }
    }

    async fn request(&self, prompt: &str) -> Result<Vec<String>, AdvisoryError> {
        if !self.config.enabled {
            return Err(AdvisoryError::Disabled);
        }
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key,
            _ => return Err(AdvisoryError::MissingApiKey),
        };

        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stream: false,
        };

        debug!("Requesting advice from {} ({})", self.config.endpoint(), self.config.model);

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Advisory API returned {}", status);
            return Err(AdvisoryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AdvisoryError::Timeout(self.config.timeout_ms)
            } else {
                AdvisoryError::MalformedResponse(e.to_string())
            }
        })?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AdvisoryError::MalformedResponse("no choices in response".to_string()))?;

        parse_advice(&content)
    }
}

impl AdvisoryService for HttpAdvisor {
    async fn advise(&self, prompt: &str) -> Result<Vec<String>, AdvisoryError> {
        self.request(prompt).await
    }
}
