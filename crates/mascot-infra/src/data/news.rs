//! News CSV loader.
//!
//! News rows come from a spreadsheet export with the columns
//! `id,kind,title,body,body_past,date,expiry,rank,tags,prefixes`.
//! The `prefixes` cell is `;`-separated; when it is empty the row gets the
//! built-in prefix set for its kind. Dates accept RFC 3339 or `YYYY-MM-DD`;
//! anything unparseable is logged and treated as absent rather than failing
//! the whole load.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::warn;

use mascot_types::error::NewsError;
use mascot_types::news::{NewsItem, NewsKind};

/// Raw CSV row before enrichment.
#[derive(Debug, Deserialize)]
struct RawNewsRow {
    #[serde(default)]
    id: String,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    body_past: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    expiry: String,
    #[serde(default)]
    rank: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    prefixes: String,
}

/// Load and enrich news items from a CSV file.
///
/// Rows missing an id or a title are skipped with a warning.
pub fn load_news(path: &Path) -> Result<Vec<NewsItem>, NewsError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        if e.is_io_error() {
            NewsError::FileNotFound(path.display().to_string())
        } else {
            NewsError::Parse(e.to_string())
        }
    })?;

    let mut items = Vec::new();
    for row in reader.deserialize::<RawNewsRow>() {
        let row = row.map_err(|e| NewsError::Parse(e.to_string()))?;
        let id = row.id.trim();
        let title = row.title.trim();
        if id.is_empty() || title.is_empty() {
            warn!("skipping news row without id or title");
            continue;
        }

        let kind = NewsKind::parse_lossy(&row.kind);
        let prefixes = parse_prefixes(&row.prefixes, kind);

        items.push(NewsItem {
            id: id.to_string(),
            kind,
            title: title.to_string(),
            body: row.body.trim().to_string(),
            body_past: non_empty(&row.body_past),
            date: parse_date(&row.date, id, "date"),
            expiry: parse_date(&row.expiry, id, "expiry"),
            rank: row.rank.trim().to_string(),
            tags: row.tags.trim().to_string(),
            prefixes,
        });
    }

    Ok(items)
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Parse an RFC 3339 or `YYYY-MM-DD` date cell; bad values warn and become
/// `None`.
fn parse_date(value: &str, id: &str, field: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0).unwrap().and_utc());
    }

    warn!(id, field, value, "unparseable news date, treating as absent");
    None
}

/// Split a `;`-separated prefixes cell, falling back to the built-in set
/// for the row's kind.
fn parse_prefixes(cell: &str, kind: NewsKind) -> Vec<String> {
    let explicit: Vec<String> = cell
        .split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    if explicit.is_empty() {
        default_prefixes(kind).iter().map(|p| p.to_string()).collect()
    } else {
        explicit
    }
}

/// Built-in conversational lead-ins per kind.
fn default_prefixes(kind: NewsKind) -> &'static [&'static str] {
    match kind {
        NewsKind::Event => &[
            "I've got to tell you about this one:",
            "Here's an event I'm really excited about:",
            "You should totally come along:",
            "There's a good one coming up:",
        ],
        NewsKind::Notice => &[
            "Quick heads-up:",
            "Don't miss this:",
            "I have to let you know:",
            "Here's something important:",
        ],
        NewsKind::Result => &[
            "Guess what happened:",
            "Let me brag for a second:",
            "Here's a win worth sharing:",
            "I'm pretty proud of this:",
        ],
        NewsKind::Report => &[
            "A while back,",
            "Here's how it went:",
            "Little report for you:",
            "We held this one recently:",
        ],
        NewsKind::Other => &[
            "By the way,",
            "Worth knowing:",
            "Hear me out:",
            "Let me share a little something:",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "id,kind,title,body,body_past,date,expiry,rank,tags,prefixes\n";

    fn write_csv(rows: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        file.write_all(rows.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_news_full_row() {
        let file = write_csv(
            "n1,event,Open day,Doors at ten,Doors were at ten,2025-06-14,2025-07-01T00:00:00Z,A,campus,Come along!;Heads up!\n",
        );
        let items = load_news(file.path()).unwrap();
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.id, "n1");
        assert_eq!(item.kind, NewsKind::Event);
        assert_eq!(item.body_past.as_deref(), Some("Doors were at ten"));
        assert_eq!(item.date.unwrap().format("%Y-%m-%d").to_string(), "2025-06-14");
        assert_eq!(item.expiry.unwrap().format("%Y-%m-%d").to_string(), "2025-07-01");
        assert_eq!(item.rank, "A");
        assert_eq!(item.prefixes, vec!["Come along!", "Heads up!"]);
    }

    #[test]
    fn test_empty_prefixes_fall_back_per_kind() {
        let file = write_csv("n1,notice,Term dates,Published,,,,B,,\n");
        let items = load_news(file.path()).unwrap();
        assert_eq!(items[0].kind, NewsKind::Notice);
        assert_eq!(items[0].prefixes.len(), 4);
        assert!(items[0].prefixes[0].contains("heads-up"));
    }

    #[test]
    fn test_unknown_kind_becomes_other() {
        let file = write_csv("n1,misc,Fun fact,We have a studio cat,,,,C,,\n");
        let items = load_news(file.path()).unwrap();
        assert_eq!(items[0].kind, NewsKind::Other);
    }

    #[test]
    fn test_bad_date_becomes_none() {
        let file = write_csv("n1,event,Open day,Doors at ten,,not-a-date,,A,,\n");
        let items = load_news(file.path()).unwrap();
        assert!(items[0].date.is_none());
    }

    #[test]
    fn test_rows_without_id_or_title_are_skipped() {
        let file = write_csv(",event,No id,body,,,,A,,\nn2,event,,body,,,,A,,\nn3,event,Kept,body,,,,A,,\n");
        let items = load_news(file.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "n3");
    }

    #[test]
    fn test_missing_file() {
        let err = load_news(Path::new("/nonexistent/news.csv")).unwrap_err();
        assert!(matches!(err, NewsError::FileNotFound(_)));
    }
}
