//! LlmProvider trait definition.
//!
//! This is the core abstraction implemented by every LLM backend. Uses
//! RPITIT for `complete`; the object-safe wrapper lives in
//! [`super::box_provider`].

use mascot_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities};

/// Trait for LLM provider backends (Gemini, OpenAI-compatible, etc.).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Because of
/// that, the trait is not object-safe; use [`super::BoxLlmProvider`] where
/// dynamic dispatch is needed.
///
/// Implementations live in mascot-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini", "openai_compat").
    fn name(&self) -> &str;

    /// What this provider supports (function calling, output limits).
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
