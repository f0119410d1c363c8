//! Tool (function-calling) abstraction and registry.
//!
//! A [`Tool`] is a capability the LLM may invoke mid-conversation. This
//! deployment ships a single web-search tool, but the loop is written
//! against the registry so capabilities stay pluggable.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use mascot_types::llm::{ToolDeclaration, ToolOutput};

/// A capability the model can request by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable function name advertised to the model.
    fn name(&self) -> &str;

    /// One-sentence description shown to the model.
    fn description(&self) -> &str;

    /// JSON schema of the function parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with model-supplied arguments.
    ///
    /// Implementations should fold recoverable failures (network errors,
    /// empty results) into the returned output text so the model can react;
    /// `Err` is reserved for argument-shape problems.
    async fn execute(&self, args: Value) -> anyhow::Result<ToolOutput>;
}

/// Name-indexed set of tools advertised to the model.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Later registrations under the same name replace
    /// earlier ones.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| &**tool)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Declarations for every registered tool, sorted by name so request
    /// payloads are stable.
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        let mut declarations: Vec<ToolDeclaration> = self
            .tools
            .values()
            .map(|tool| ToolDeclaration {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            })
            .collect();
        declarations.sort_by(|a, b| a.name.cmp(&b.name));
        declarations
    }
}
