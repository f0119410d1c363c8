//! HTTP request handlers.

pub mod chat;
pub mod greeting;
pub mod narrative;
