//! Canonical record model shared by both export parsers

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Timelike, Utc};
use serde::Serialize;

/// Interaction category attached to every canonical record.
///
/// Drives ranking priority (`like` outranks everything else in the
/// multi-type format) and is passed through to the work unit; the
/// pipeline attaches no further meaning to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Watch,
    Like,
    Subscribe,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Self::Watch => "watch",
            Self::Like => "like",
            Self::Subscribe => "subscribe",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// When an interaction happened, at centisecond granularity.
///
/// Source timestamps that fail to parse are retained as
/// [`Invalid`](Self::Invalid) carrying the raw string; such records
/// sort after every parsed timestamp under recency ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum OccurredAt {
    Time(DateTime<Utc>),
    Invalid(String),
}

impl OccurredAt {
    /// Parse a source timestamp, truncating fractional seconds to
    /// two decimal places. Unparseable input is logged and retained.
    pub fn parse(raw: &str) -> Self {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Self::Time(truncate_centis(dt.with_timezone(&Utc)));
        }
        // Exports occasionally carry naive timestamps; treat as UTC.
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Self::Time(truncate_centis(naive.and_utc()));
            }
        }
        log::info!("unparseable timestamp retained as-is: {raw:?}");
        Self::Invalid(raw.to_string())
    }

    /// Parsed time, or `None` for the invalid sentinel.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Time(dt) => Some(*dt),
            Self::Invalid(_) => None,
        }
    }
}

impl std::fmt::Display for OccurredAt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Time(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Invalid(raw) => f.write_str(raw),
        }
    }
}

fn truncate_centis(dt: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = dt.nanosecond();
    dt.with_nanosecond(nanos / 10_000_000 * 10_000_000)
        .unwrap_or(dt)
}

/// One normalized watch/interaction entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub video_id: String,
    pub title: String,
    pub channel_name: String,
    pub category: Category,
    pub occurred_at: OccurredAt,
}

/// Extract the video id from an export URL: everything after the last
/// `=` (the full URL when there is none — the 11-char filter catches
/// those where it applies).
pub fn video_id_from_url(url: &str) -> &str {
    url.rsplit('=').next().unwrap_or(url)
}
