//! Local queue endpoints: JSONL work queue and FIFO notify

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use watchline_core::{IngestError, QueueSink, WorkUnit};

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{line}")
}

/// Work queue backed by an append-only JSONL file: one line per
/// accepted unit. Everything it manages to write is accepted.
#[derive(Debug)]
pub struct JsonlQueue {
    path: PathBuf,
}

impl JsonlQueue {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl QueueSink for JsonlQueue {
    fn send_chunk(&mut self, chunk: &[WorkUnit]) -> Result<usize, IngestError> {
        for unit in chunk {
            let line = serde_json::to_string(unit)
                .map_err(|e| IngestError::Queue(format!("serialize {}: {e}", unit.key)))?;
            append_line(&self.path, &line)
                .map_err(|e| IngestError::Queue(format!("{}: {e}", self.path.display())))?;
        }
        Ok(chunk.len())
    }
}

/// Best-effort forward of the raw trigger payload to a FIFO-style
/// side queue. Failures here are the caller's to log and swallow.
#[derive(Debug)]
pub struct FifoNotify {
    path: PathBuf,
}

impl FifoNotify {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Append the raw event body, grouped by file id with a
    /// file-id + timestamp dedup token.
    pub fn forward(&self, group: &str, dedup_token: &str, body: &str) -> Result<()> {
        let line = serde_json::to_string(&serde_json::json!({
            "group": group,
            "dedup_token": dedup_token,
            "body": body,
            "queued_at": chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }))
        .context("failed to serialize notify message")?;
        append_line(&self.path, &line)
            .with_context(|| format!("failed to append to {}", self.path.display()))
    }
}
