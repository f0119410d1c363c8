//! News selection and the prompt-splice decision.
//!
//! Selection filters the loaded news items by expiry and rank at read time,
//! switches dated announcements to their past-tense body once their date has
//! passed, and attaches one randomly chosen conversational prefix per item.
//! The splice decision maps the session's turn snapshot to the rank (if any)
//! that should be injected into this turn's system prompt.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use mascot_types::config::NewsConfig;
use mascot_types::news::NewsItem;

use crate::session::TurnSnapshot;

/// A news item prepared for prompt injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNews {
    pub prefix: String,
    pub title: String,
    pub body: String,
}

/// Select the active news items of `rank` at `now`.
///
/// Expired items are dropped. Event/notice items whose date has passed use
/// `body_past` when available. The prefix is picked with `rng` so callers
/// (and tests) control determinism.
pub fn active_news<R: Rng + ?Sized>(
    items: &[NewsItem],
    rank: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<ActiveNews> {
    items
        .iter()
        .filter(|item| !item.is_expired(now) && item.rank == rank)
        .map(|item| {
            let body = past_tense_body(item, now);
            let prefix = pick_prefix(&item.prefixes, rng);
            ActiveNews {
                prefix,
                title: item.title.clone(),
                body: body.to_string(),
            }
        })
        .collect()
}

/// The body to show at `now`: dated announcements switch to their
/// past-tense rewrite once the event date has passed.
fn past_tense_body(item: &NewsItem, now: DateTime<Utc>) -> &str {
    if item.kind.is_dated_announcement() {
        if let (Some(date), Some(past)) = (item.date, item.body_past.as_deref()) {
            if date < now {
                return past;
            }
        }
    }
    &item.body
}

fn pick_prefix<R: Rng + ?Sized>(prefixes: &[String], rng: &mut R) -> String {
    if prefixes.is_empty() {
        return String::new();
    }
    prefixes[rng.gen_range(0..prefixes.len())].clone()
}

/// Decide which news rank (if any) to splice into this turn's prompt.
///
/// - First turn of a session: the headline rank.
/// - First turn after an idle gap of at least `idle_reintroduce_minutes`:
///   the headline rank again.
/// - Every `recurring_interval`-th turn: the secondary rank.
/// - Otherwise nothing.
pub fn injection_rank<'a>(turn: &TurnSnapshot, config: &'a NewsConfig) -> Option<&'a str> {
    if turn.turn_count == 1 {
        return Some(&config.headline_rank);
    }

    if let Some(idle) = turn.idle {
        if idle >= Duration::minutes(config.idle_reintroduce_minutes) {
            return Some(&config.headline_rank);
        }
    }

    if config.recurring_interval > 0 && turn.turn_count % config.recurring_interval == 0 {
        return Some(&config.secondary_rank);
    }

    None
}
