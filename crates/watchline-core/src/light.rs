//! Parser for the multi-type export
//!
//! A JSON object carrying `items.likes` and `items.subs` lists. The
//! two lists are normalized separately, tagged `like` and `subscribe`,
//! and concatenated likes-first with each list's internal order
//! preserved. No id length filter and no dedup here — this format is
//! handed to the ranking engine, which dedups after ordering.

use serde::Deserialize;

use crate::error::IngestError;
use crate::record::{Category, OccurredAt, Record, video_id_from_url};

#[derive(Debug, Default, Deserialize)]
struct LightExport {
    #[serde(default)]
    items: LightItems,
}

#[derive(Debug, Default, Deserialize)]
struct LightItems {
    #[serde(default)]
    likes: Vec<LightEntry>,
    #[serde(default)]
    subs: Vec<LightEntry>,
}

#[derive(Debug, Deserialize)]
struct LightEntry {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "channelName", default)]
    channel_name: Option<String>,
}

/// Parse the multi-type export into canonical records, likes first.
pub fn parse(raw: &str) -> Result<Vec<Record>, IngestError> {
    let export: LightExport = serde_json::from_str(raw)?;

    let likes = export.items.likes.len();
    let subs = export.items.subs.len();
    let mut records = Vec::new();
    for (entries, category) in [
        (export.items.likes, Category::Like),
        (export.items.subs, Category::Subscribe),
    ] {
        records.extend(entries.into_iter().filter_map(|e| normalize(e, category)));
    }
    log::debug!(
        "light: {} of {} entries survived normalization ({likes} likes, {subs} subs)",
        records.len(),
        likes + subs,
    );
    Ok(records)
}

fn normalize(entry: LightEntry, category: Category) -> Option<Record> {
    let url = entry.url?;
    let title = entry.title?;
    let channel_name = entry.channel_name?;

    // A missing timestamp is not a drop condition for this format; it
    // is retained as the invalid sentinel and sorts last in ranking.
    let occurred_at = match entry.timestamp {
        Some(ts) => OccurredAt::parse(&ts),
        None => OccurredAt::Invalid(String::new()),
    };

    Some(Record {
        video_id: video_id_from_url(&url).to_string(),
        title,
        channel_name,
        category,
        occurred_at,
    })
}
