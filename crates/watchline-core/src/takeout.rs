//! Parser for the single-type watch-history export
//!
//! A JSON array of watch entries. Entries missing a required field are
//! dropped, ids are length-checked, and duplicate ids within the file
//! keep their first occurrence. Output order equals filtered input
//! order; this format never goes through the ranking engine.

use rustc_hash::FxHashSet;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::IngestError;
use crate::record::{Category, OccurredAt, Record, video_id_from_url};

/// Canonical id length after extraction; anything else is noise from
/// malformed URLs.
const VIDEO_ID_LEN: usize = 11;

#[derive(Debug, Deserialize)]
struct WatchEntry {
    #[serde(rename = "titleUrl", default)]
    title_url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    /// List of maps; the channel name is the first value of the first map.
    #[serde(default)]
    subtitles: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    time: Option<String>,
}

/// Parse the single-type export into canonical records.
pub fn parse(raw: &str) -> Result<Vec<Record>, IngestError> {
    let entries: Vec<WatchEntry> = serde_json::from_str(raw)?;
    let total = entries.len();

    let mut seen = FxHashSet::default();
    let mut records = Vec::new();
    for entry in entries {
        let Some(record) = normalize(entry) else {
            continue;
        };
        if seen.insert(record.video_id.clone()) {
            records.push(record);
        }
    }
    log::debug!(
        "takeout: {} of {total} entries survived normalization",
        records.len()
    );
    Ok(records)
}

fn normalize(entry: WatchEntry) -> Option<Record> {
    let url = entry.title_url?;
    let title = entry.title?;
    let subtitles = entry.subtitles?;
    let time = entry.time?;

    // An empty subtitles list has no channel to extract; treated like
    // a missing field.
    let channel_name = subtitles
        .first()?
        .values()
        .next()?
        .as_str()?
        .to_string();

    let video_id = video_id_from_url(&url);
    if video_id.len() != VIDEO_ID_LEN {
        return None;
    }

    Some(Record {
        video_id: video_id.to_string(),
        title,
        channel_name,
        category: Category::Watch,
        occurred_at: OccurredAt::parse(&time),
    })
}
