//! The chat endpoint.
//!
//! POST /api/v1/chat
//!
//! Flow: validate the body -> resolve or create the session -> record the
//! turn -> assemble the system prompt (seasonal line + spliced news) ->
//! run the bounded tool-calling loop -> append the reply to the session
//! transcript -> respond with `{ session_id, message }`.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use mascot_core::agent::ToolCallLoop;
use mascot_core::news::{active_news, injection_rank};
use mascot_core::prompt::SystemPromptBuilder;
use mascot_types::chat::{ChatMessage, ChatReply, ChatRequest, ChatRole};
use mascot_types::error::AgentError;
use mascot_types::llm::{CompletionRequest, LlmError, Message};

use crate::http::error::{AppError, apology};
use crate::state::AppState;

/// POST /api/v1/chat -- one turn of persona conversation.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let (user_message, session_id) = validate(&body)?;
    let session_id = session_id.unwrap_or_else(Uuid::now_v7);
    let now = Utc::now();

    // The server-side transcript is the source of truth; only the newest
    // message from the posted transcript is appended.
    let snapshot = state.sessions.begin_turn(
        session_id,
        ChatMessage::user(user_message.content.clone()),
        now,
    );
    info!(%session_id, turn = snapshot.turn_count, "chat turn started");

    let seasonal = state.seasonal_line(now).await;

    let news = match injection_rank(&snapshot, &state.config.news) {
        Some(rank) => active_news(&state.news, rank, now, &mut rand::thread_rng()),
        None => Vec::new(),
    };

    let system = SystemPromptBuilder::build(&state.persona, now, seasonal.as_deref(), &news);

    let request = CompletionRequest {
        model: state.config.llm.chat_model.clone(),
        messages: to_llm_messages(&snapshot.history),
        system: Some(system),
        tools: state.tools.declarations(),
        temperature: None,
        max_tokens: state.config.llm.max_tokens,
    };

    let tool_loop = ToolCallLoop::new(
        &state.tools,
        state.config.llm.effective_tool_loop_limit(),
    );
    let outcome = match tool_loop.run(&state.chat_provider, request).await {
        Ok(outcome) => outcome,
        Err(AgentError::Llm(LlmError::Overloaded(detail))) => {
            error!(%session_id, detail, "upstream overloaded");
            return Err(AppError::Overloaded);
        }
        Err(e) => {
            error!(%session_id, error = %e, "chat turn failed");
            return Err(AppError::Apology(apology(&state.persona.nickname)));
        }
    };

    // A loop that produced no text at all still answers in character.
    let reply = outcome
        .reply
        .unwrap_or_else(|| empty_reply_fallback(&state.persona.nickname));

    state
        .sessions
        .record_reply(session_id, ChatMessage::assistant(reply.clone()));
    info!(
        %session_id,
        rounds = outcome.rounds,
        tool_invocations = outcome.tool_invocations,
        "chat turn finished"
    );

    Ok(Json(ChatReply {
        session_id,
        message: reply,
    }))
}

/// Check the request shape; returns the newest user message and the parsed
/// session id.
fn validate(body: &ChatRequest) -> Result<(&ChatMessage, Option<Uuid>), AppError> {
    let last = body
        .messages
        .last()
        .ok_or_else(|| AppError::Validation("messages must not be empty".to_string()))?;

    if last.role != ChatRole::User {
        return Err(AppError::Validation(
            "the last message must come from the user".to_string(),
        ));
    }
    if last.content.trim().is_empty() {
        return Err(AppError::Validation(
            "the user message must not be blank".to_string(),
        ));
    }

    let session_id = match &body.session_id {
        None => None,
        Some(raw) => Some(
            Uuid::parse_str(raw)
                .map_err(|_| AppError::Validation(format!("invalid session id: '{raw}'")))?,
        ),
    };

    Ok((last, session_id))
}

/// Map the widget transcript to LLM conversation messages.
fn to_llm_messages(history: &[ChatMessage]) -> Vec<Message> {
    history
        .iter()
        .map(|msg| match msg.role {
            ChatRole::User => Message::user(msg.content.clone()),
            ChatRole::Assistant => Message::assistant(msg.content.clone()),
        })
        .collect()
}

/// In-character fallback when the model produced no text at all.
fn empty_reply_fallback(nickname: &str) -> String {
    format!("Sorry, {nickname} totally failed to put that into words 😭! Ask me again?")
}
