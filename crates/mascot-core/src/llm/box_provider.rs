//! BoxLlmProvider -- object-safe dynamic dispatch wrapper for LlmProvider.
//!
//! 1. Define an object-safe `LlmProviderDyn` trait with boxed futures
//! 2. Blanket-impl `LlmProviderDyn` for all `T: LlmProvider`
//! 3. `BoxLlmProvider` wraps `Box<dyn LlmProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use mascot_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities};

use super::provider::LlmProvider;

/// Object-safe version of [`LlmProvider`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch (`dyn LlmProviderDyn`).
/// A blanket implementation is provided for all types implementing `LlmProvider`.
pub trait LlmProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> &ProviderCapabilities;

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;
}

/// Blanket implementation: any `LlmProvider` automatically implements `LlmProviderDyn`.
impl<T: LlmProvider> LlmProviderDyn for T {
    fn name(&self) -> &str {
        LlmProvider::name(self)
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        LlmProvider::capabilities(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>> {
        Box::pin(self.complete(request))
    }
}

/// Type-erased LLM provider for runtime provider selection.
///
/// Wraps any `LlmProvider` implementation behind dynamic dispatch, so the
/// application state can hold the chat provider and the utility provider
/// uniformly whatever their concrete backends are.
pub struct BoxLlmProvider {
    inner: Box<dyn LlmProviderDyn + Send + Sync>,
}

impl BoxLlmProvider {
    /// Wrap a concrete `LlmProvider` in a type-erased box.
    pub fn new<T: LlmProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    /// Human-readable provider name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// What this provider supports.
    pub fn capabilities(&self) -> &ProviderCapabilities {
        self.inner.capabilities()
    }

    /// Send a completion request and receive the full response.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        self.inner.complete_boxed(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mascot_types::llm::{Message, Usage};

    struct EchoProvider {
        capabilities: ProviderCapabilities,
    }

    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        fn capabilities(&self) -> &ProviderCapabilities {
            &self.capabilities
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                id: "echo_1".to_string(),
                model: request.model.clone(),
                content: format!("{} messages", request.messages.len()),
                tool_call: None,
                usage: Usage::default(),
            })
        }
    }

    #[tokio::test]
    async fn test_box_provider_delegates() {
        let boxed = BoxLlmProvider::new(EchoProvider {
            capabilities: ProviderCapabilities {
                tool_calling: false,
                max_output_tokens: 1024,
            },
        });
        assert_eq!(boxed.name(), "echo");
        assert!(!boxed.capabilities().tool_calling);

        let request = CompletionRequest {
            model: "test-model".to_string(),
            messages: vec![Message::user("hi")],
            system: None,
            tools: Vec::new(),
            temperature: None,
            max_tokens: 64,
        };
        let response = boxed.complete(&request).await.unwrap();
        assert_eq!(response.content, "1 messages");
        assert_eq!(response.model, "test-model");
    }
}
