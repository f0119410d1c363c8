//! Business logic for Mascot.
//!
//! This crate holds everything between the HTTP boundary and the outbound
//! adapters: the provider and tool abstractions, the bounded tool-calling
//! loop, the session tracker, news selection, and system prompt assembly.
//! Concrete providers and loaders live in `mascot-infra`.

pub mod agent;
pub mod llm;
pub mod news;
pub mod prompt;
pub mod session;
pub mod tool;
