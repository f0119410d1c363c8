//! Session record types.
//!
//! Each chat session is keyed by a UUID and tracks how many turns it has
//! seen and when the user last spoke. The record drives the decision of
//! when to splice news content into the system prompt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-session bookkeeping: turn count and last user-input time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Number of user turns seen so far (1-based after the first turn).
    pub turn_count: u32,
    /// Timestamp of the most recent user input.
    pub last_input_at: DateTime<Utc>,
}

impl SessionRecord {
    /// A fresh record for a session whose first input arrived at `now`.
    pub fn first_turn(now: DateTime<Utc>) -> Self {
        Self {
            turn_count: 1,
            last_input_at: now,
        }
    }
}
