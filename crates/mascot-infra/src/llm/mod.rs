//! LLM provider implementations.

pub mod gemini;
pub mod openai_compat;

pub use gemini::GeminiProvider;
pub use openai_compat::OpenAiCompatProvider;
