//! Application configuration.
//!
//! Deserialized from `mascot.toml`. Every field has a serde default so a
//! missing or partial file still yields a runnable configuration. API
//! credentials are deliberately NOT part of this file -- they come from the
//! environment (see `mascot-infra`).

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub persona: PersonaConfig,
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub news: NewsConfig,
    pub data: DataConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

/// Display names for the persona. The profile tables supply everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    pub name: String,
    pub nickname: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: "Northgate College of Music".to_string(),
            nickname: "Northgate".to_string(),
        }
    }
}

/// LLM model selection and tool-loop bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model used for the chat endpoint (must support function calling).
    pub chat_model: String,
    /// Model used for utility generations (seasonal line, narrative).
    pub utility_model: String,
    pub max_tokens: u32,
    /// Temperature for the seasonal one-liner (high for variety).
    pub seasonal_temperature: f64,
    /// Temperature for the narrative self-introduction.
    pub narrative_temperature: f64,
    /// Maximum tool-calling rounds per request. Clamped to 1..=5.
    pub tool_loop_limit: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            chat_model: "gemini-2.5-pro".to_string(),
            utility_model: "gpt-4o".to_string(),
            max_tokens: 1024,
            seasonal_temperature: 1.2,
            narrative_temperature: 0.85,
            tool_loop_limit: 3,
        }
    }
}

impl LlmConfig {
    /// The tool-loop bound with the 1..=5 clamp applied.
    pub fn effective_tool_loop_limit(&self) -> u32 {
        self.tool_loop_limit.clamp(1, 5)
    }
}

/// Web search tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of results forwarded to the model.
    pub max_results: u32,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 3,
            timeout_secs: 10,
        }
    }
}

/// News injection policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// Rank injected on a session's first turn and after an idle gap.
    pub headline_rank: String,
    /// Rank injected every `recurring_interval` turns.
    pub secondary_rank: String,
    pub recurring_interval: u32,
    /// Idle minutes after which the headline rank is reintroduced.
    pub idle_reintroduce_minutes: i64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            headline_rank: "A".to_string(),
            secondary_rank: "B".to_string(),
            recurring_interval: 3,
            idle_reintroduce_minutes: 30,
        }
    }
}

/// Locations of the persona and news data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: String,
    pub personality_file: String,
    pub behavior_file: String,
    pub news_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
            personality_file: "personality.csv".to_string(),
            behavior_file: "behavior.csv".to_string(),
            news_file: "news.csv".to_string(),
        }
    }
}
