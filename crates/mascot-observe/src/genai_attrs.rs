//! OpenTelemetry GenAI Semantic Convention attribute constants.
//!
//! These follow the OTel GenAI Semantic Conventions specification for
//! consistent LLM call instrumentation across the codebase. All constants
//! are string slices usable in `tracing::span!` and `tracing::info_span!`
//! field names.
//!
//! Span naming convention: `"{operation} {model}"` (e.g., `"chat gemini-2.5-pro"`)

// --- Required attributes ---

/// The name of the operation being performed (e.g., "chat", "execute_tool").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g., "gemini").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

// --- Recommended attributes ---

/// The model ID requested (e.g., "gemini-2.5-pro").
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// The sampling temperature for the request.
pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";

/// The maximum number of output tokens requested.
pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";

/// The number of input tokens consumed.
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

/// The number of output tokens generated.
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

/// The name of the tool the model asked to invoke.
pub const GEN_AI_TOOL_NAME: &str = "gen_ai.tool.name";

// --- Operation name values ---

/// Standard chat completion operation.
pub const OP_CHAT: &str = "chat";

/// Execution of a model-requested tool.
pub const OP_EXECUTE_TOOL: &str = "execute_tool";

/// Seasonal one-liner generation.
pub const OP_SEASONAL_GREETING: &str = "seasonal_greeting";

/// Narrative self-introduction generation.
pub const OP_GENERATE_NARRATIVE: &str = "generate_narrative";

// --- Provider name values ---

/// Gemini provider identifier.
pub const PROVIDER_GEMINI: &str = "gemini";

/// OpenAI-compatible provider identifier.
pub const PROVIDER_OPENAI_COMPAT: &str = "openai_compat";
