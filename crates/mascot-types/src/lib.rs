//! Shared domain types for Mascot.
//!
//! This crate holds the data shapes used across the workspace: chat
//! transcripts, provider-agnostic LLM types, persona profiles, news items,
//! session records, configuration, and domain errors. No I/O lives here.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod news;
pub mod persona;
pub mod session;
