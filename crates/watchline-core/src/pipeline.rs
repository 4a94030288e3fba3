//! Pipeline runner: raw export text to delivered work units
//!
//! The runner performs no storage I/O of its own. The caller fetches
//! the raw blob, loads the global-id set, and persists both the set
//! and the status record afterwards; the work queue is injected as a
//! trait object. One invocation processes exactly one export blob,
//! synchronously.

use chrono::{DateTime, Utc};

use crate::batch::build_units;
use crate::dedup::{SeenIds, admit_new};
use crate::error::IngestError;
use crate::queue::{QueueSink, send_in_chunks};
use crate::record::Record;
use crate::{light, rank, takeout};

/// Which export format produced the raw blob.
///
/// Resolved by the caller from the source bucket tag; a tag matching
/// neither format is a configuration error at that boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Single-type watch-history export (parsed, never ranked).
    Full,
    /// Multi-type likes/subs export (parsed, then ranked).
    Light,
}

impl Origin {
    pub fn label(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Light => "light",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-run context stamped onto work units and the summary. Not part
/// of the dedup or ranking logic.
#[derive(Debug, Clone)]
pub struct RunMetadata {
    pub file_id: String,
    pub origin_bucket: String,
    pub ingested_at: DateTime<Utc>,
}

/// Counts and metadata returned to the caller after a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Global-id set size before the run.
    pub num_videos_before: usize,
    /// Global-id set size after the run.
    pub num_videos_after: usize,
    pub new_videos_added: usize,
    pub duplicates_not_added: usize,
    pub messages_sent: usize,
    /// Per-run-unique records parsed from the file (post-ranking).
    pub unique_in_file: usize,
    pub file_id: String,
    pub origin_bucket: String,
    pub ingested_at: DateTime<Utc>,
}

/// Derive the file id from a storage key: final extension stripped,
/// directories preserved.
pub fn file_id_from_key(key: &str) -> String {
    match key.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains('/') => stem.to_string(),
        _ => key.to_string(),
    }
}

/// Parse raw export text into the canonical ordered record set.
///
/// The multi-type format goes through the ranking engine; the
/// single-type format keeps its filtered input order.
pub fn parse_export(raw: &str, origin: Origin) -> Result<Vec<Record>, IngestError> {
    match origin {
        Origin::Full => takeout::parse(raw),
        Origin::Light => Ok(rank::rank(light::parse(raw)?)),
    }
}

/// Run the full pipeline over one export blob.
///
/// parse → rank (light only) → dedup gate → batch builder → chunked
/// send. `seen` is mutated in place; the caller persists it when it
/// grew. Any `Err` leaves persisted state untouched by construction —
/// nothing here writes storage.
pub fn run(
    raw: &str,
    origin: Origin,
    meta: &RunMetadata,
    seen: &mut SeenIds,
    sink: &mut dyn QueueSink,
) -> Result<RunSummary, IngestError> {
    let records = parse_export(raw, origin)?;
    let unique_in_file = records.len();

    let before = seen.len();
    let admitted = admit_new(records, seen);
    let after = seen.len();
    let new_videos_added = after - before;

    let units = build_units(&admitted, &meta.file_id);
    let messages_sent = send_in_chunks(sink, &units)?;

    let summary = RunSummary {
        num_videos_before: before,
        num_videos_after: after,
        new_videos_added,
        duplicates_not_added: unique_in_file - new_videos_added,
        messages_sent,
        unique_in_file,
        file_id: meta.file_id.clone(),
        origin_bucket: meta.origin_bucket.clone(),
        ingested_at: meta.ingested_at,
    };
    log::info!(
        "run {}: {} unique in file, {} new, {} duplicate, {} sent (set {} -> {})",
        summary.file_id,
        summary.unique_in_file,
        summary.new_videos_added,
        summary.duplicates_not_added,
        summary.messages_sent,
        summary.num_videos_before,
        summary.num_videos_after,
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::WorkUnit;

    struct AcceptAll;

    impl QueueSink for AcceptAll {
        fn send_chunk(&mut self, chunk: &[WorkUnit]) -> Result<usize, IngestError> {
            Ok(chunk.len())
        }
    }

    fn meta() -> RunMetadata {
        RunMetadata {
            file_id: "uploads/export-1".into(),
            origin_bucket: "watchline-exports".into(),
            ingested_at: Utc::now(),
        }
    }

    #[test]
    fn file_id_strips_final_extension() {
        assert_eq!(file_id_from_key("uploads/export-1.json"), "uploads/export-1");
        assert_eq!(file_id_from_key("archive.tar.gz"), "archive.tar");
    }

    #[test]
    fn file_id_without_extension_unchanged() {
        assert_eq!(file_id_from_key("no-extension"), "no-extension");
        assert_eq!(file_id_from_key(".hidden"), ".hidden");
        assert_eq!(file_id_from_key("dir.v1/file"), "dir.v1/file");
    }

    #[test]
    fn run_counts_add_up() {
        let raw = r#"[
            {"titleUrl": "https://y.be/watch?v=aaaaaaaaaaa", "title": "a",
             "subtitles": [{"name": "c"}], "time": "2024-01-01T00:00:00Z"},
            {"titleUrl": "https://y.be/watch?v=bbbbbbbbbbb", "title": "b",
             "subtitles": [{"name": "c"}], "time": "2024-01-02T00:00:00Z"}
        ]"#;
        let mut seen: SeenIds = ["aaaaaaaaaaa".to_string()].into_iter().collect();

        let summary = run(raw, Origin::Full, &meta(), &mut seen, &mut AcceptAll).unwrap();

        assert_eq!(summary.num_videos_before, 1);
        assert_eq!(summary.num_videos_after, 2);
        assert_eq!(summary.new_videos_added, 1);
        assert_eq!(summary.duplicates_not_added, 1);
        assert_eq!(summary.messages_sent, 1);
        assert_eq!(summary.unique_in_file, 2);
        assert_eq!(summary.file_id, "uploads/export-1");
    }

    #[test]
    fn malformed_blob_leaves_seen_untouched() {
        let mut seen = SeenIds::new();
        let err = run("nonsense", Origin::Full, &meta(), &mut seen, &mut AcceptAll);
        assert!(err.is_err());
        assert!(seen.is_empty());
    }
}
