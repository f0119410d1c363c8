//! The bounded tool-calling loop.
//!
//! Sends the conversation to the LLM; when the response asks for a function
//! invocation, executes it, appends both the call and its result to the
//! conversation, and resubmits. Terminates when the model answers with text
//! or when the round bound is reached. GenAI spans instrument every LLM call.

use tracing::{Instrument, debug, info_span, warn};

use mascot_types::error::AgentError;
use mascot_types::llm::{CompletionRequest, Message, ToolOutput};

use crate::llm::BoxLlmProvider;
use crate::tool::ToolRegistry;

/// Result of a completed loop run.
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    /// Final textual reply. `None` when the model never produced text
    /// (e.g. it still wanted a tool when the bound was hit).
    pub reply: Option<String>,
    /// LLM rounds consumed (1-based).
    pub rounds: u32,
    /// Number of tool invocations executed.
    pub tool_invocations: u32,
}

/// Bounded iteration driving LLM completions and tool execution.
pub struct ToolCallLoop<'a> {
    registry: &'a ToolRegistry,
    limit: u32,
}

impl<'a> ToolCallLoop<'a> {
    /// Create a loop over `registry` with a hard bound of `limit` rounds.
    ///
    /// `limit` is taken as-is; config-level clamping happens at load time.
    pub fn new(registry: &'a ToolRegistry, limit: u32) -> Self {
        Self {
            registry,
            limit: limit.max(1),
        }
    }

    /// Run the loop to completion.
    ///
    /// The request's `messages` grow in place as tool calls and results are
    /// appended. An unknown function name aborts the whole request; tool
    /// execution failures are folded into the result text so the model can
    /// recover.
    pub async fn run(
        &self,
        provider: &BoxLlmProvider,
        mut request: CompletionRequest,
    ) -> Result<LoopOutcome, AgentError> {
        let mut last_text: Option<String> = None;
        let mut tool_invocations = 0u32;
        let mut rounds = 0u32;

        for round in 1..=self.limit {
            rounds = round;

            let span = info_span!(
                "gen_ai.chat",
                gen_ai.provider.name = provider.name(),
                gen_ai.request.model = %request.model,
                round,
            );
            let response = provider.complete(&request).instrument(span).await?;

            if !response.content.is_empty() {
                last_text = Some(response.content.clone());
            }

            let Some(call) = response.tool_call else {
                // No function requested: the answer is final.
                return Ok(LoopOutcome {
                    reply: last_text,
                    rounds,
                    tool_invocations,
                });
            };

            let tool = self
                .registry
                .get(&call.name)
                .ok_or_else(|| AgentError::UnknownTool(call.name.clone()))?;

            debug!(tool = %call.name, round, "executing requested function");
            let span = info_span!("gen_ai.execute_tool", gen_ai.tool.name = %call.name);
            let output = match tool
                .execute(call.arguments.clone())
                .instrument(span)
                .await
            {
                Ok(output) => output,
                Err(e) => {
                    // Soft failure: let the model see what went wrong.
                    warn!(tool = %call.name, error = %e, "tool execution failed");
                    ToolOutput {
                        name: call.name.clone(),
                        content: format!("Tool execution failed: {e}"),
                    }
                }
            };
            tool_invocations += 1;

            request.messages.push(Message::tool_call(call));
            request.messages.push(Message::tool_result(output));
        }

        // Bound reached while the model still wanted a tool. Fall back to
        // the last text it produced, if any.
        debug!(rounds, "tool-call bound reached");
        Ok(LoopOutcome {
            reply: last_text,
            rounds,
            tool_invocations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use mascot_types::llm::{
        CompletionResponse, LlmError, ProviderCapabilities, ToolCall, Usage,
    };

    use crate::llm::provider::LlmProvider;
    use crate::tool::Tool;

    /// Provider that replays a scripted sequence of responses.
    struct ScriptedProvider {
        responses: Mutex<Vec<Result<CompletionResponse, LlmError>>>,
        capabilities: ProviderCapabilities,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<CompletionResponse, LlmError>>) -> BoxLlmProvider {
            BoxLlmProvider::new(Self {
                responses: Mutex::new(responses),
                capabilities: ProviderCapabilities {
                    tool_calling: true,
                    max_output_tokens: 1024,
                },
            })
        }
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn capabilities(&self) -> &ProviderCapabilities {
            &self.capabilities
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.responses
                .lock()
                .unwrap()
                .remove(0)
        }
    }

    fn text_response(text: &str) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            id: "r".to_string(),
            model: "m".to_string(),
            content: text.to_string(),
            tool_call: None,
            usage: Usage::default(),
        })
    }

    fn tool_response(name: &str) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            id: "r".to_string(),
            model: "m".to_string(),
            content: String::new(),
            tool_call: Some(ToolCall {
                name: name.to_string(),
                arguments: json!({"query": "open day"}),
            }),
            usage: Usage::default(),
        })
    }

    struct CountingTool {
        calls: AtomicU32,
        fail: bool,
    }

    impl CountingTool {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl Tool for CountingTool {
        fn name(&self) -> &str {
            "web_search"
        }

        fn description(&self) -> &str {
            "Search the web"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {"query": {"type": "string"}}})
        }

        async fn execute(&self, _args: Value) -> anyhow::Result<ToolOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("network unreachable");
            }
            Ok(ToolOutput {
                name: "web_search".to_string(),
                content: "Title: Open day\nSnippet: ...\nURL: https://example.edu".to_string(),
            })
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "m".to_string(),
            messages: vec![Message::user("when is the open day?")],
            system: Some("persona".to_string()),
            tools: Vec::new(),
            temperature: None,
            max_tokens: 256,
        }
    }

    #[tokio::test]
    async fn test_plain_answer_terminates_in_one_round() {
        let provider = ScriptedProvider::new(vec![text_response("next Saturday")]);
        let registry = ToolRegistry::new();
        let outcome = ToolCallLoop::new(&registry, 3)
            .run(&provider, request())
            .await
            .unwrap();
        assert_eq!(outcome.reply.as_deref(), Some("next Saturday"));
        assert_eq!(outcome.rounds, 1);
        assert_eq!(outcome.tool_invocations, 0);
    }

    #[tokio::test]
    async fn test_tool_call_then_answer() {
        let provider = ScriptedProvider::new(vec![
            tool_response("web_search"),
            text_response("it's on June 14"),
        ]);
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(CountingTool::new(false)));

        let outcome = ToolCallLoop::new(&registry, 3)
            .run(&provider, request())
            .await
            .unwrap();
        assert_eq!(outcome.reply.as_deref(), Some("it's on June 14"));
        assert_eq!(outcome.rounds, 2);
        assert_eq!(outcome.tool_invocations, 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_fatal() {
        let provider = ScriptedProvider::new(vec![tool_response("teleport")]);
        let registry = ToolRegistry::new();
        let err = ToolCallLoop::new(&registry, 3)
            .run(&provider, request())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::UnknownTool(name) if name == "teleport"));
    }

    #[tokio::test]
    async fn test_loop_terminates_at_bound() {
        // The model asks for the tool on every round; the loop must stop at
        // the bound instead of spinning.
        let provider = ScriptedProvider::new(vec![
            tool_response("web_search"),
            tool_response("web_search"),
            tool_response("web_search"),
        ]);
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(CountingTool::new(false)));

        let outcome = ToolCallLoop::new(&registry, 3)
            .run(&provider, request())
            .await
            .unwrap();
        assert_eq!(outcome.rounds, 3);
        assert_eq!(outcome.tool_invocations, 3);
        assert!(outcome.reply.is_none());
    }

    #[tokio::test]
    async fn test_tool_failure_is_soft() {
        let provider = ScriptedProvider::new(vec![
            tool_response("web_search"),
            text_response("sorry, I couldn't look that up"),
        ]);
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(CountingTool::new(true)));

        let outcome = ToolCallLoop::new(&registry, 3)
            .run(&provider, request())
            .await
            .unwrap();
        assert_eq!(outcome.reply.as_deref(), Some("sorry, I couldn't look that up"));
        assert_eq!(outcome.tool_invocations, 1);
    }

    #[tokio::test]
    async fn test_llm_error_propagates() {
        let provider =
            ScriptedProvider::new(vec![Err(LlmError::Overloaded("503".to_string()))]);
        let registry = ToolRegistry::new();
        let err = ToolCallLoop::new(&registry, 3)
            .run(&provider, request())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Llm(LlmError::Overloaded(_))));
    }

    #[tokio::test]
    async fn test_conversation_grows_with_call_and_result() {
        // After one tool round the conversation should carry the assistant
        // call and the tool result so the resubmission has full context.
        struct CapturingProvider {
            capabilities: ProviderCapabilities,
            seen_lens: std::sync::Arc<Mutex<Vec<usize>>>,
        }

        impl LlmProvider for CapturingProvider {
            fn name(&self) -> &str {
                "capturing"
            }

            fn capabilities(&self) -> &ProviderCapabilities {
                &self.capabilities
            }

            async fn complete(
                &self,
                request: &CompletionRequest,
            ) -> Result<CompletionResponse, LlmError> {
                let mut lens = self.seen_lens.lock().unwrap();
                lens.push(request.messages.len());
                let first = lens.len() == 1;
                drop(lens);
                if first {
                    tool_response("web_search")
                } else {
                    text_response("done")
                }
            }
        }

        let seen_lens = std::sync::Arc::new(Mutex::new(Vec::new()));
        let provider = BoxLlmProvider::new(CapturingProvider {
            capabilities: ProviderCapabilities {
                tool_calling: true,
                max_output_tokens: 1024,
            },
            seen_lens: seen_lens.clone(),
        });
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(CountingTool::new(false)));

        let outcome = ToolCallLoop::new(&registry, 3)
            .run(&provider, request())
            .await
            .unwrap();
        assert_eq!(outcome.reply.as_deref(), Some("done"));
        // Round 1 saw the original single message; round 2 saw it plus the
        // appended call and result.
        assert_eq!(*seen_lens.lock().unwrap(), vec![1, 3]);
    }
}
