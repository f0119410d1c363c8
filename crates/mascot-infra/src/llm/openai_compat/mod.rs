//! OpenAiCompatProvider -- [`LlmProvider`] implementation for any
//! OpenAI-compatible `chat/completions` endpoint.
//!
//! Used for the utility generations (seasonal one-liner, narrative
//! self-introduction), which need plain text completions only. Function
//! calling is deliberately unsupported here; requests carrying tool
//! declarations are rejected up front.
//!
//! Same API-key handling as [`super::gemini::GeminiProvider`]: the key lives
//! in a [`SecretString`] and the type does not derive `Debug`.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use mascot_core::llm::provider::LlmProvider;
use mascot_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageContent, MessageRole,
    ProviderCapabilities, Usage,
};

/// Wire message for `chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

/// Request body for `chat/completions`.
#[derive(Debug, Clone, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    max_tokens: u32,
}

/// Response body for `chat/completions`.
#[derive(Debug, Clone, Deserialize)]
struct WireResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// OpenAI-compatible LLM provider for plain text completions.
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl OpenAiCompatProvider {
    /// Create a new provider against the default OpenAI endpoint.
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            model,
            capabilities: ProviderCapabilities {
                tool_calling: false,
                max_output_tokens: 4_096,
            },
        }
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (any OpenAI-compatible server, or a test stub).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Flatten the generic request into wire messages.
    ///
    /// The system instruction becomes a leading `system` message. Tool
    /// messages cannot occur here (tool-carrying requests are rejected
    /// before conversion).
    fn to_wire_request(request: &CompletionRequest) -> Result<WireRequest, LlmError> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        for message in &request.messages {
            let MessageContent::Text { text } = &message.content else {
                return Err(LlmError::InvalidRequest(
                    "tool messages are not supported by this provider".to_string(),
                ));
            };
            let role = match message.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
                MessageRole::Tool => {
                    return Err(LlmError::InvalidRequest(
                        "tool messages are not supported by this provider".to_string(),
                    ));
                }
            };
            messages.push(WireMessage {
                role: role.to_string(),
                content: text.clone(),
            });
        }

        Ok(WireRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        })
    }
}

impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai_compat"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        if !request.tools.is_empty() {
            return Err(LlmError::InvalidRequest(
                "function calling is not supported by this provider".to_string(),
            ));
        }

        let body = Self::to_wire_request(request)?;

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                400 => LlmError::InvalidRequest(error_body),
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited,
                503 | 529 => LlmError::Overloaded(error_body),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = wire
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        let usage = wire
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: wire.id,
            model: if wire.model.is_empty() {
                request.model.clone()
            } else {
                wire.model
            },
            content: content.trim().to_string(),
            tool_call: None,
            usage,
        })
    }
}
