//! Global video-id snapshot persistence
//!
//! The snapshot is a sorted JSON array of id strings, written via a
//! tmp file and atomic rename. There is no locking or versioning:
//! concurrent runs loading the same snapshot can both admit an id —
//! callers needing strict dedup serialize invocations externally.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use watchline_core::SeenIds;

/// Policy for a snapshot file that does not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSnapshot {
    /// Fail the run; an operator bootstraps explicitly
    /// (`watchline snapshot init`). The default.
    Fail,
    /// Start from an empty set.
    StartEmpty,
}

/// Reads and writes the global-id snapshot.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    missing: MissingSnapshot,
}

impl SnapshotStore {
    pub fn new(path: &Path, missing: MissingSnapshot) -> Self {
        Self {
            path: path.to_path_buf(),
            missing,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the id set. A missing file follows the configured policy;
    /// a corrupt file always fails.
    pub fn load(&self) -> Result<SeenIds> {
        if !self.path.exists() {
            return match self.missing {
                MissingSnapshot::Fail => anyhow::bail!(
                    "no id snapshot at {} (run `watchline snapshot init` to bootstrap)",
                    self.path.display()
                ),
                MissingSnapshot::StartEmpty => {
                    log::warn!(
                        "no id snapshot at {}, starting from an empty set",
                        self.path.display()
                    );
                    Ok(SeenIds::new())
                }
            };
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read snapshot {}", self.path.display()))?;
        let ids: Vec<String> = serde_json::from_str(&content)
            .with_context(|| format!("corrupt snapshot {}", self.path.display()))?;
        log::debug!("loaded {} ids from {}", ids.len(), self.path.display());
        Ok(ids.into_iter().collect())
    }

    /// Persist the id set, sorted for deterministic output. Atomic:
    /// write to a tmp file, then rename over the target.
    pub fn save(&self, seen: &SeenIds) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let mut ids: Vec<&str> = seen.iter().collect();
        ids.sort_unstable();
        let json = serde_json::to_string(&ids).context("failed to serialize snapshot")?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path).with_context(|| {
            format!("failed to rename {} -> {}", tmp.display(), self.path.display())
        })?;

        log::info!("saved {} ids to {}", ids.len(), self.path.display());
        Ok(())
    }
}
