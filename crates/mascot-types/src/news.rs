//! News item types.
//!
//! News items are short announcements loaded from a data file and spliced
//! into the system prompt on selected turns. Each item carries an optional
//! event date, an optional expiry, a rank used for selection, and a set of
//! conversational prefixes the persona uses to introduce it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a news item. Drives the fallback prefix set and the past-tense
/// body swap (events and notices switch to `body_past` once dated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsKind {
    Event,
    Notice,
    Result,
    Report,
    Other,
}

impl NewsKind {
    /// Parse a kind string from the data file; anything unknown is `Other`.
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "event" => NewsKind::Event,
            "notice" => NewsKind::Notice,
            "result" => NewsKind::Result,
            "report" => NewsKind::Report,
            _ => NewsKind::Other,
        }
    }

    /// Whether this kind switches to its past-tense body once its date passes.
    pub fn is_dated_announcement(self) -> bool {
        matches!(self, NewsKind::Event | NewsKind::Notice)
    }
}

/// A single news item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub kind: NewsKind,
    pub title: String,
    pub body: String,
    /// Past-tense rewrite of `body`, used once `date` has passed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_past: Option<String>,
    /// When the announced event takes place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Items past this instant are never selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
    /// Selection rank ("A" headline, "B" secondary, ...).
    pub rank: String,
    pub tags: String,
    /// Conversational lead-ins; one is picked at random per selection.
    pub prefixes: Vec<String>,
}

impl NewsItem {
    /// Whether the item is expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|e| e < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(expiry: Option<DateTime<Utc>>) -> NewsItem {
        NewsItem {
            id: "n1".to_string(),
            kind: NewsKind::Event,
            title: "Open day".to_string(),
            body: "Open day is coming up".to_string(),
            body_past: None,
            date: None,
            expiry,
            rank: "A".to_string(),
            tags: "campus".to_string(),
            prefixes: vec!["By the way,".to_string()],
        }
    }

    #[test]
    fn test_kind_parse_lossy() {
        assert_eq!(NewsKind::parse_lossy("Event"), NewsKind::Event);
        assert_eq!(NewsKind::parse_lossy(" notice "), NewsKind::Notice);
        assert_eq!(NewsKind::parse_lossy("whatever"), NewsKind::Other);
    }

    #[test]
    fn test_dated_announcement_kinds() {
        assert!(NewsKind::Event.is_dated_announcement());
        assert!(NewsKind::Notice.is_dated_announcement());
        assert!(!NewsKind::Result.is_dated_announcement());
        assert!(!NewsKind::Report.is_dated_announcement());
        assert!(!NewsKind::Other.is_dated_announcement());
    }

    #[test]
    fn test_is_expired() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        assert!(!item(None).is_expired(now));

        let future = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        assert!(!item(Some(future)).is_expired(now));

        let past = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        assert!(item(Some(past)).is_expired(now));
    }

    #[test]
    fn test_news_item_serde_skips_absent_fields() {
        let json = serde_json::to_string(&item(None)).unwrap();
        assert!(!json.contains("body_past"));
        assert!(!json.contains("expiry"));
        let parsed: NewsItem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, "n1");
    }
}
