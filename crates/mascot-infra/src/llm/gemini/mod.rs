//! GeminiProvider -- concrete [`LlmProvider`] implementation for the
//! Generative Language API.
//!
//! Sends non-streaming `generateContent` requests with function
//! declarations and maps the first candidate's parts back to the generic
//! completion types.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

pub mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use mascot_core::llm::provider::LlmProvider;
use mascot_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, MessageContent,
    ProviderCapabilities, ToolCall, Usage,
};

use self::types::{
    GeminiContent, GeminiFunctionCall, GeminiFunctionDeclaration, GeminiFunctionResponse,
    GeminiGenerationConfig, GeminiPart, GeminiRequest, GeminiResponse, GeminiToolGroup,
};

/// Gemini LLM provider.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers. It never appears in Debug output,
/// Display output, or tracing logs.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model,
            capabilities: ProviderCapabilities {
                tool_calling: true,
                max_output_tokens: 8_192,
            },
        }
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the full `generateContent` URL for the request's model.
    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    /// Convert a generic [`CompletionRequest`] into a [`GeminiRequest`].
    fn to_gemini_request(request: &CompletionRequest) -> GeminiRequest {
        let contents = request.messages.iter().map(Self::to_content).collect();

        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(vec![GeminiToolGroup {
                function_declarations: request
                    .tools
                    .iter()
                    .map(|t| GeminiFunctionDeclaration {
                        name: t.name.clone(),
                        description: t.description.clone(),
                        parameters: t.parameters.clone(),
                    })
                    .collect(),
            }])
        };

        GeminiRequest {
            contents,
            system_instruction: request.system.as_deref().map(GeminiContent::text_only),
            tools,
            generation_config: Some(GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            }),
        }
    }

    /// Map one generic message to a Gemini content block.
    ///
    /// Roles: user stays `user`, the assistant becomes `model`, and tool
    /// results travel under the `function` role as `functionResponse` parts.
    fn to_content(message: &Message) -> GeminiContent {
        match &message.content {
            MessageContent::Text { text } => GeminiContent {
                role: Some(
                    match message.role {
                        mascot_types::llm::MessageRole::Assistant => "model",
                        _ => "user",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart::Text { text: text.clone() }],
            },
            MessageContent::ToolCall(call) => GeminiContent {
                role: Some("model".to_string()),
                parts: vec![GeminiPart::FunctionCall {
                    function_call: GeminiFunctionCall {
                        name: call.name.clone(),
                        args: call.arguments.clone(),
                    },
                }],
            },
            MessageContent::ToolResult(output) => GeminiContent {
                role: Some("function".to_string()),
                parts: vec![GeminiPart::FunctionResponse {
                    function_response: GeminiFunctionResponse {
                        name: output.name.clone(),
                        response: serde_json::json!({ "result": output.content }),
                    },
                }],
            },
        }
    }

    /// Extract the generic response from the first candidate.
    fn from_gemini_response(model: &str, response: GeminiResponse) -> CompletionResponse {
        let mut content = String::new();
        let mut tool_call = None;

        if let Some(candidate) = response.candidates.into_iter().next() {
            if let Some(parts) = candidate.content.map(|c| c.parts) {
                for part in parts {
                    match part {
                        GeminiPart::Text { text } => content.push_str(&text),
                        GeminiPart::FunctionCall { function_call } if tool_call.is_none() => {
                            tool_call = Some(ToolCall {
                                name: function_call.name,
                                arguments: function_call.args,
                            });
                        }
                        _ => {}
                    }
                }
            }
        }

        let usage = response
            .usage_metadata
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        CompletionResponse {
            id: response.response_id.unwrap_or_default(),
            model: response
                .model_version
                .unwrap_or_else(|| model.to_string()),
            content,
            tool_call,
            usage,
        }
    }
}

// GeminiProvider intentionally does NOT derive Debug to prevent accidental
// exposure of internal state; the SecretString field ensures the API key is
// never printed.

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = Self::to_gemini_request(request);
        let url = self.url(&request.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
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

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        Ok(Self::from_gemini_response(&request.model, gemini_resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use mascot_types::llm::{ToolDeclaration, ToolOutput};

    fn make_provider() -> GeminiProvider {
        GeminiProvider::new(
            SecretString::from("test-key-not-real"),
            "gemini-2.5-pro".to_string(),
        )
    }

    fn request_with_tools() -> CompletionRequest {
        CompletionRequest {
            model: "gemini-2.5-pro".to_string(),
            messages: vec![
                Message::user("when is the open day?"),
                Message::tool_call(ToolCall {
                    name: "web_search".to_string(),
                    arguments: json!({"query": "open day"}),
                }),
                Message::tool_result(ToolOutput {
                    name: "web_search".to_string(),
                    content: "June 14".to_string(),
                }),
            ],
            system: Some("persona".to_string()),
            tools: vec![ToolDeclaration {
                name: "web_search".to_string(),
                description: "Search the web".to_string(),
                parameters: json!({"type": "object"}),
            }],
            temperature: None,
            max_tokens: 1024,
        }
    }

    #[test]
    fn test_provider_name_and_capabilities() {
        let provider = make_provider();
        assert_eq!(LlmProvider::name(&provider), "gemini");
        assert!(provider.capabilities().tool_calling);
    }

    #[test]
    fn test_url_building() {
        let provider = make_provider().with_base_url("http://localhost:8080".to_string());
        assert_eq!(
            provider.url("gemini-2.5-pro"),
            "http://localhost:8080/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn test_to_gemini_request_roles_and_parts() {
        let body = GeminiProvider::to_gemini_request(&request_with_tools());

        assert_eq!(body.contents.len(), 3);
        assert_eq!(body.contents[0].role.as_deref(), Some("user"));
        assert_eq!(body.contents[1].role.as_deref(), Some("model"));
        assert_eq!(body.contents[2].role.as_deref(), Some("function"));
        assert!(matches!(
            body.contents[1].parts[0],
            GeminiPart::FunctionCall { .. }
        ));
        assert!(matches!(
            body.contents[2].parts[0],
            GeminiPart::FunctionResponse { .. }
        ));
        assert!(body.system_instruction.is_some());
        assert_eq!(body.tools.as_ref().unwrap()[0].function_declarations.len(), 1);
    }

    #[test]
    fn test_to_gemini_request_without_tools_omits_field() {
        let request = CompletionRequest {
            model: "gemini-2.5-pro".to_string(),
            messages: vec![Message::assistant("hi")],
            system: None,
            tools: Vec::new(),
            temperature: Some(0.5),
            max_tokens: 64,
        };
        let body = GeminiProvider::to_gemini_request(&request);
        assert!(body.tools.is_none());
        assert!(body.system_instruction.is_none());
        assert_eq!(body.contents[0].role.as_deref(), Some("model"));
    }

    #[test]
    fn test_from_gemini_response_text() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "hello "}, {"text": "there"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 4},
            "responseId": "r1"
        }))
        .unwrap();

        let completion = GeminiProvider::from_gemini_response("gemini-2.5-pro", response);
        assert_eq!(completion.content, "hello there");
        assert!(completion.tool_call.is_none());
        assert_eq!(completion.usage.input_tokens, 10);
        assert_eq!(completion.id, "r1");
    }

    #[test]
    fn test_from_gemini_response_function_call() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"functionCall": {"name": "web_search", "args": {"query": "open day"}}}]
                }
            }]
        }))
        .unwrap();

        let completion = GeminiProvider::from_gemini_response("gemini-2.5-pro", response);
        let call = completion.tool_call.unwrap();
        assert_eq!(call.name, "web_search");
        assert_eq!(call.arguments["query"], "open day");
        assert!(completion.content.is_empty());
    }

    #[test]
    fn test_from_gemini_response_empty_candidates() {
        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        let completion = GeminiProvider::from_gemini_response("gemini-2.5-pro", response);
        assert!(completion.content.is_empty());
        assert!(completion.tool_call.is_none());
        assert_eq!(completion.model, "gemini-2.5-pro");
    }
}
