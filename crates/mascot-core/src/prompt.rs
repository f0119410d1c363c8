//! System prompt assembly for the persona.
//!
//! The system instruction is assembled from the persona's profile tables,
//! the current date, an optional seasonal one-liner, and the news items
//! selected for this turn, using XML tag boundaries for clear section
//! delineation. Assembly is deterministic given fixed inputs and a fixed
//! clock.
//!
//! This module also builds the two utility completion requests: the
//! first-person narrative self-introduction and the dated seasonal
//! one-liner.

use chrono::{DateTime, Utc};

use mascot_types::llm::{CompletionRequest, Message};
use mascot_types::persona::Persona;

use crate::news::ActiveNews;

/// Builds the system instruction for a chat turn.
///
/// Layout:
/// ```text
/// <greeting>Hey! ... seasonal line ...</greeting>
/// <persona>first/third-person profile narrative</persona>
/// <today>Today's date is ...</today>
/// <news>- prefix title: body</news>
/// <instructions>You are {name}...</instructions>
/// ```
pub struct SystemPromptBuilder;

impl SystemPromptBuilder {
    /// Build the complete system instruction.
    pub fn build(
        persona: &Persona,
        now: DateTime<Utc>,
        seasonal: Option<&str>,
        news: &[ActiveNews],
    ) -> String {
        let mut sections = Vec::with_capacity(5);

        // Greeting section -- nickname opener plus the seasonal line.
        let mut greeting = format!("Hey! {} here!", persona.nickname);
        if let Some(line) = seasonal {
            let line = line.trim();
            if !line.is_empty() {
                greeting.push('\n');
                greeting.push_str(line);
            }
        }
        greeting.push_str("\nSo, what shall we talk about today?");
        sections.push(format!("<greeting>\n{greeting}\n</greeting>"));

        // Persona section -- narrative built from the profile tables.
        sections.push(format!(
            "<persona>\n{}\n</persona>",
            Self::profile_narrative(persona)
        ));

        // Date section -- anchors "today" for the model.
        sections.push(format!(
            "<today>\nToday's date is {}.\n</today>",
            now.format("%Y-%m-%d")
        ));

        // News section -- only when this turn carries news.
        if !news.is_empty() {
            let lines: Vec<String> = news
                .iter()
                .map(|item| {
                    if item.prefix.is_empty() {
                        format!("- {}: {}", item.title, item.body)
                    } else {
                        format!("- {} {}: {}", item.prefix, item.title, item.body)
                    }
                })
                .collect();
            sections.push(format!(
                "<news>\nWork these updates into the conversation naturally:\n{}\n</news>",
                lines.join("\n")
            ));
        }

        // Instructions section -- behavioral guardrails.
        sections.push(format!(
            "<instructions>\n\
            You are {name}, speaking as \"{nickname}\". Always stay in character.\n\
            Answer as the institution itself, never as an assistant describing it.\n\
            Use the web search function for current facts you cannot know.\n\
            Keep replies short enough for a chat bubble.\n\
            </instructions>",
            name = persona.name,
            nickname = persona.nickname,
        ));

        sections.join("\n\n")
    }

    /// Render the persona's profile tables as a narrative paragraph.
    ///
    /// Well-known keys get fluent sentences; the narrative degrades
    /// gracefully when keys are missing (empty values render as blanks the
    /// model reads past, matching how half-filled profile files behave).
    fn profile_narrative(persona: &Persona) -> String {
        let p = &persona.personality;
        let b = &persona.behavior;

        let mut lines = Vec::new();
        lines.push(format!(
            "I am {}, known to everyone as {}.",
            persona.name, persona.nickname
        ));
        if let Some(founded) = p.get("founded") {
            lines.push(format!("I was founded in {founded}."));
        }
        if let Some(location) = p.get("location") {
            lines.push(format!("You'll find me in {location}."));
        }
        lines.push(format!(
            "My character is \"{}\" and I hold \"{}\" dear; \"{}\" is the motto I live by.",
            p.get_or_empty("personality"),
            p.get_or_empty("values"),
            p.get_or_empty("motto"),
        ));
        if let Some(notable) = p.get("notable") {
            lines.push(format!("Something worth knowing about me: {notable}."));
        }
        lines.push(format!(
            "I usually speak in {} with {} reactions.",
            b.get_or_empty("tone"),
            b.get_or_empty("reaction_style"),
        ));
        if let Some(goal) = b.get("conversation_goal") {
            lines.push(format!("In conversation I aim for {goal}."));
        }
        lines.push(format!(
            "My favorite topics are {} and I love {}.",
            p.get_or_empty("strengths"),
            p.get_or_empty("likes"),
        ));
        if let Some(taboo) = p.get("taboo_topics") {
            lines.push(format!("I steer away from {taboo}."));
        }
        if let Some(triggers) = b.get("conversation_triggers") {
            lines.push(format!("I like to open with {triggers}."));
        }

        lines.join("\n")
    }

    /// Completion request asking the utility model to write the persona's
    /// first-person self-introduction from the merged profile tables.
    pub fn narrative_request(
        persona: &Persona,
        model: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> CompletionRequest {
        let profile_text: String = persona
            .personality
            .entries()
            .chain(persona.behavior.entries())
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n");

        let user_prompt = format!(
            "Based on the profile below, write a self-introduction in which {name} \
             talks about itself in the first person. Weave in its history, \
             character, values, sense of distance, way of speaking, favorite \
             topics, and dislikes.\n\n[Profile]\n{profile_text}",
            name = persona.name,
        );

        CompletionRequest {
            model: model.to_string(),
            messages: vec![Message::user(user_prompt)],
            system: Some(
                "You are a character writer. Given an institution's profile, \
                 produce a natural first-person self-introduction in its voice."
                    .to_string(),
            ),
            tools: Vec::new(),
            temperature: Some(temperature),
            max_tokens,
        }
    }

    /// Completion request for the dated seasonal one-liner.
    ///
    /// High temperature on purpose: the line should vary day to day.
    pub fn seasonal_request(
        persona: &Persona,
        now: DateTime<Utc>,
        model: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> CompletionRequest {
        let prompt = format!(
            "Today is {date}.\n\
             You are the personified chat presence of {name}.\n\
             Write one short, friendly small-talk remark that fits this time of \
             year, the kind of line {nickname} would drop into a chat greeting.\n\
             Rules:\n\
             1. Casual register only; no stiff or formal phrasing.\n\
             2. A light emoji or two is fine.\n\
             3. Return exactly one sentence, with no surrounding quotes.",
            date = now.format("%B %-d, %Y"),
            name = persona.name,
            nickname = persona.nickname,
        );

        CompletionRequest {
            model: model.to_string(),
            messages: vec![Message::user(prompt)],
            system: None,
            tools: Vec::new(),
            temperature: Some(temperature),
            max_tokens,
        }
    }
}
