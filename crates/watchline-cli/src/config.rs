//! Configuration loading from TOML files

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use watchline_core::Origin;
use watchline_store::{DirObjectStore, MissingSnapshot};

/// Global configuration for watchline
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub buckets: BucketsConfig,
    pub snapshot: SnapshotConfig,
    pub queue: QueueConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Snapshot, status records, and queue files live under here.
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./data"),
        }
    }
}

/// The two supported export origins, each a named bucket backed by a
/// local directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BucketsConfig {
    pub full: BucketConfig,
    pub light: BucketConfig,
}

impl Default for BucketsConfig {
    fn default() -> Self {
        Self {
            full: BucketConfig {
                name: "watchline-exports".to_string(),
                dir: PathBuf::from("./exports"),
            },
            light: BucketConfig {
                name: "watchline-light-exports".to_string(),
                dir: PathBuf::from("./exports-light"),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketConfig {
    pub name: String,
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Snapshot file path (default: {data.dir}/ids.json).
    pub file: Option<PathBuf>,
    /// Treat a missing snapshot as an empty set instead of failing.
    /// Off by default: bootstrapping is an explicit operator action
    /// (`watchline snapshot init`).
    pub bootstrap_empty: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct QueueConfig {
    /// Work queue file (default: {data.dir}/queue/work.jsonl).
    pub work: Option<PathBuf>,
    /// Notify queue file (default: {data.dir}/queue/notify.jsonl).
    pub notify: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./watchline.toml (current directory)
    /// 2. ~/.config/watchline/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("watchline.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "watchline") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve a bucket name to the export format it carries.
    pub fn origin_for_bucket(&self, bucket: &str) -> Option<Origin> {
        if bucket == self.buckets.full.name {
            Some(Origin::Full)
        } else if bucket == self.buckets.light.name {
            Some(Origin::Light)
        } else {
            None
        }
    }

    pub fn object_store(&self) -> DirObjectStore {
        DirObjectStore::new()
            .with_bucket(&self.buckets.full.name, &self.buckets.full.dir)
            .with_bucket(&self.buckets.light.name, &self.buckets.light.dir)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshot
            .file
            .clone()
            .unwrap_or_else(|| self.data.dir.join("ids.json"))
    }

    pub fn missing_snapshot_policy(&self) -> MissingSnapshot {
        if self.snapshot.bootstrap_empty {
            MissingSnapshot::StartEmpty
        } else {
            MissingSnapshot::Fail
        }
    }

    pub fn status_dir(&self) -> PathBuf {
        self.data.dir.join("status")
    }

    pub fn work_queue_path(&self) -> PathBuf {
        self.queue
            .work
            .clone()
            .unwrap_or_else(|| self.data.dir.join("queue/work.jsonl"))
    }

    pub fn notify_queue_path(&self) -> PathBuf {
        self.queue
            .notify
            .clone()
            .unwrap_or_else(|| self.data.dir.join("queue/notify.jsonl"))
    }
}
