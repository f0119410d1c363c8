//! Chat transcript types and the HTTP chat protocol bodies.
//!
//! A transcript is an ordered, append-only sequence of [`ChatMessage`]s
//! within a session. The widget posts the transcript it has accumulated so
//! far; the service replies with a single assistant message.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Role of a message in the widget-facing transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for ChatRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(ChatRole::User),
            "assistant" => Ok(ChatRole::Assistant),
            other => Err(format!("invalid chat role: '{other}'")),
        }
    }
}

/// A single message in a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Convenience constructor for a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Convenience constructor for an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request body for `POST /api/v1/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// The transcript accumulated by the widget, newest message last.
    pub messages: Vec<ChatMessage>,
    /// Existing session id to continue; a new session is created when absent.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Success body for `POST /api/v1/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub session_id: Uuid,
    pub message: String,
}
