//! Process-wide session tracking.
//!
//! Maps session ids to their turn count, last-input timestamp, and the
//! accumulated transcript. State is held in memory only and entries are
//! never evicted: the map grows for the lifetime of the process, which is
//! the intended behavior for this demo-scale service.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use mascot_types::chat::ChatMessage;
use mascot_types::session::SessionRecord;

/// Full in-memory state for one session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub record: SessionRecord,
    /// Append-only transcript, oldest first.
    pub history: Vec<ChatMessage>,
}

/// Snapshot handed to the request handler when a turn begins.
#[derive(Debug, Clone)]
pub struct TurnSnapshot {
    /// Turn count including the turn being started.
    pub turn_count: u32,
    /// Gap since the previous user input; `None` on the first turn.
    pub idle: Option<Duration>,
    /// Transcript including the just-appended user message.
    pub history: Vec<ChatMessage>,
}

/// Shared map from session id to session state.
///
/// `DashMap` gives per-entry locking, so concurrent requests for the same
/// session increment the turn count atomically.
#[derive(Default)]
pub struct SessionTracker {
    sessions: DashMap<Uuid, SessionState>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a turn: bump the counter, stamp the input time, append the
    /// user message, and return a snapshot for prompt assembly.
    pub fn begin_turn(
        &self,
        session_id: Uuid,
        user_message: ChatMessage,
        now: DateTime<Utc>,
    ) -> TurnSnapshot {
        let mut entry = self
            .sessions
            .entry(session_id)
            .or_insert_with(|| SessionState {
                record: SessionRecord {
                    turn_count: 0,
                    last_input_at: now,
                },
                history: Vec::new(),
            });

        let idle = if entry.record.turn_count == 0 {
            None
        } else {
            Some(now - entry.record.last_input_at)
        };

        entry.record.turn_count += 1;
        entry.record.last_input_at = now;
        entry.history.push(user_message);

        TurnSnapshot {
            turn_count: entry.record.turn_count,
            idle,
            history: entry.history.clone(),
        }
    }

    /// Append the assistant reply to the session transcript.
    ///
    /// A reply for a session that was never started is dropped (the handler
    /// always begins the turn first, so this only happens in tests).
    pub fn record_reply(&self, session_id: Uuid, reply: ChatMessage) {
        if let Some(mut entry) = self.sessions.get_mut(&session_id) {
            entry.history.push(reply);
        }
    }

    /// Current record for a session, if it exists.
    pub fn record(&self, session_id: Uuid) -> Option<SessionRecord> {
        self.sessions.get(&session_id).map(|s| s.record.clone())
    }

    /// Number of sessions tracked so far.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, 0).unwrap()
    }

    #[test]
    fn test_first_turn_has_no_idle() {
        let tracker = SessionTracker::new();
        let id = Uuid::now_v7();
        let snapshot = tracker.begin_turn(id, ChatMessage::user("hi"), at(0));
        assert_eq!(snapshot.turn_count, 1);
        assert!(snapshot.idle.is_none());
        assert_eq!(snapshot.history.len(), 1);
    }

    #[test]
    fn test_turn_count_increments_and_idle_is_measured() {
        let tracker = SessionTracker::new();
        let id = Uuid::now_v7();
        tracker.begin_turn(id, ChatMessage::user("hi"), at(0));
        tracker.record_reply(id, ChatMessage::assistant("hello!"));

        let snapshot = tracker.begin_turn(id, ChatMessage::user("more"), at(5));
        assert_eq!(snapshot.turn_count, 2);
        assert_eq!(snapshot.idle, Some(Duration::minutes(5)));
        // user, assistant, user
        assert_eq!(snapshot.history.len(), 3);
        assert_eq!(snapshot.history[2].content, "more");
    }

    #[test]
    fn test_history_is_append_only_and_ordered() {
        let tracker = SessionTracker::new();
        let id = Uuid::now_v7();
        tracker.begin_turn(id, ChatMessage::user("one"), at(0));
        tracker.record_reply(id, ChatMessage::assistant("two"));
        let snapshot = tracker.begin_turn(id, ChatMessage::user("three"), at(1));

        let contents: Vec<&str> = snapshot.history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let tracker = SessionTracker::new();
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        tracker.begin_turn(a, ChatMessage::user("a1"), at(0));
        tracker.begin_turn(b, ChatMessage::user("b1"), at(0));
        tracker.begin_turn(a, ChatMessage::user("a2"), at(1));

        assert_eq!(tracker.record(a).unwrap().turn_count, 2);
        assert_eq!(tracker.record(b).unwrap().turn_count, 1);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_record_reply_for_unknown_session_is_dropped() {
        let tracker = SessionTracker::new();
        tracker.record_reply(Uuid::now_v7(), ChatMessage::assistant("ghost"));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_concurrent_turns_do_not_lose_increments() {
        use std::sync::Arc;

        let tracker = Arc::new(SessionTracker::new());
        let id = Uuid::now_v7();
        let mut handles = Vec::new();
        for i in 0..8 {
            let tracker = Arc::clone(&tracker);
            handles.push(std::thread::spawn(move || {
                tracker.begin_turn(id, ChatMessage::user(format!("m{i}")), Utc::now());
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(tracker.record(id).unwrap().turn_count, 8);
    }
}
