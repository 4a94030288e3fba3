//! Status-record store: one document per processed input file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use watchline_core::RunSummary;

const TIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Flat, string-valued status record keyed by file id, written
/// exactly once per successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileStatus {
    pub file_id: String,
    pub file_origin: String,
    pub first_processed_at: String,
    pub num_videos_file_unique: String,
    pub num_videos_total_before: String,
    pub num_videos_total_after: String,
    pub num_videos_total_added: String,
    pub num_videos_total_duplicate: String,
    pub messages_sent: String,
    /// Only present when the run produced zero work units: the file
    /// is fully processed and this marks when that was observed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_processed_at: Option<String>,
}

impl FileStatus {
    /// Build the status record from a run summary.
    pub fn from_summary(summary: &RunSummary) -> Self {
        let last_processed_at = if summary.new_videos_added == 0 {
            Some(chrono::Utc::now().format(TIME_FMT).to_string())
        } else {
            None
        };
        Self {
            file_id: summary.file_id.clone(),
            file_origin: summary.origin_bucket.clone(),
            first_processed_at: summary.ingested_at.format(TIME_FMT).to_string(),
            num_videos_file_unique: summary.unique_in_file.to_string(),
            num_videos_total_before: summary.num_videos_before.to_string(),
            num_videos_total_after: summary.num_videos_after.to_string(),
            num_videos_total_added: summary.new_videos_added.to_string(),
            num_videos_total_duplicate: summary.duplicates_not_added.to_string(),
            messages_sent: summary.messages_sent.to_string(),
            last_processed_at,
        }
    }
}

/// Directory of status records, one JSON document per file id.
#[derive(Debug)]
pub struct StatusStore {
    dir: PathBuf,
}

impl StatusStore {
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create status dir {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    // File ids may contain path separators (storage keys do); flatten
    // them so every record is a direct child of the status dir.
    fn path_for(&self, file_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_id.replace('/', "__")))
    }

    /// Write or replace the record for its file id.
    pub fn upsert(&self, status: &FileStatus) -> Result<()> {
        let path = self.path_for(&status.file_id);
        let json = serde_json::to_string_pretty(status).context("failed to serialize status")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn get(&self, file_id: &str) -> Result<FileStatus> {
        let path = self.path_for(file_id);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("no status record for {file_id}"))?;
        serde_json::from_str(&content)
            .with_context(|| format!("corrupt status record {}", path.display()))
    }

    /// All records, ordered by file id.
    pub fn list(&self) -> Result<Vec<FileStatus>> {
        let pattern = self.dir.join("*.json");
        let mut records = Vec::new();
        for entry in glob::glob(&pattern.to_string_lossy()).context("invalid status glob")? {
            let path = match entry {
                Ok(p) => p,
                Err(_) => continue,
            };
            match std::fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|c| serde_json::from_str(&c).map_err(anyhow::Error::from))
            {
                Ok(status) => records.push(status),
                Err(e) => log::warn!("skipping {}: {e}", path.display()),
            }
        }
        records.sort_by(|a: &FileStatus, b: &FileStatus| a.file_id.cmp(&b.file_id));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchline_core::RunSummary;

    fn summary(new_added: usize, sent: usize) -> RunSummary {
        RunSummary {
            num_videos_before: 10,
            num_videos_after: 10 + new_added,
            new_videos_added: new_added,
            duplicates_not_added: 2,
            messages_sent: sent,
            unique_in_file: new_added + 2,
            file_id: "uploads/export-1".into(),
            origin_bucket: "watchline-exports".into(),
            ingested_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn upsert_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatusStore::new(dir.path()).unwrap();

        let status = FileStatus::from_summary(&summary(3, 3));
        store.upsert(&status).unwrap();

        let loaded = store.get("uploads/export-1").unwrap();
        assert_eq!(loaded, status);
        assert_eq!(loaded.num_videos_total_added, "3");
        assert_eq!(loaded.num_videos_total_after, "13");
    }

    #[test]
    fn last_processed_only_when_nothing_new() {
        let empty_run = FileStatus::from_summary(&summary(0, 0));
        assert!(empty_run.last_processed_at.is_some());

        let busy_run = FileStatus::from_summary(&summary(5, 5));
        assert!(busy_run.last_processed_at.is_none());
    }

    #[test]
    fn all_count_fields_are_strings() {
        let status = FileStatus::from_summary(&summary(3, 3));
        let json = serde_json::to_value(&status).unwrap();
        for field in [
            "num_videos_file_unique",
            "num_videos_total_before",
            "num_videos_total_after",
            "num_videos_total_added",
            "num_videos_total_duplicate",
            "messages_sent",
        ] {
            assert!(json[field].is_string(), "{field} should be a string");
        }
    }

    #[test]
    fn upsert_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatusStore::new(dir.path()).unwrap();

        store
            .upsert(&FileStatus::from_summary(&summary(3, 3)))
            .unwrap();
        store
            .upsert(&FileStatus::from_summary(&summary(0, 0)))
            .unwrap();

        let loaded = store.get("uploads/export-1").unwrap();
        assert_eq!(loaded.num_videos_total_added, "0");
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn list_orders_by_file_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatusStore::new(dir.path()).unwrap();

        let mut b = FileStatus::from_summary(&summary(1, 1));
        b.file_id = "b-export".into();
        let mut a = FileStatus::from_summary(&summary(1, 1));
        a.file_id = "a-export".into();
        store.upsert(&b).unwrap();
        store.upsert(&a).unwrap();

        let all = store.list().unwrap();
        let ids: Vec<&str> = all.iter().map(|s| s.file_id.as_str()).collect();
        assert_eq!(ids, ["a-export", "b-export"]);
    }

    #[test]
    fn get_missing_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatusStore::new(dir.path()).unwrap();
        assert!(store.get("nope").is_err());
    }
}
