//! Raw export blob fetch: bucket names mapped to local directories

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Object store resolving bucket names to local directories.
///
/// Plays the role remote object storage plays in a deployed setup;
/// the pipeline only ever needs "give me the UTF-8 text at
/// (bucket, key), or fail". Any failure is fatal to the run.
#[derive(Debug, Default)]
pub struct DirObjectStore {
    roots: HashMap<String, PathBuf>,
}

impl DirObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bucket name backed by a local directory.
    pub fn with_bucket(mut self, name: &str, dir: &Path) -> Self {
        self.roots.insert(name.to_string(), dir.to_path_buf());
        self
    }

    /// Fetch the object at (bucket, key) as UTF-8 text.
    pub fn fetch(&self, bucket: &str, key: &str) -> Result<String> {
        let root = self
            .roots
            .get(bucket)
            .with_context(|| format!("unknown bucket: {bucket}"))?;
        let path = root.join(key);
        std::fs::read_to_string(&path)
            .with_context(|| format!("failed to fetch {bucket}/{key} ({})", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_reads_file_under_bucket_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("uploads")).unwrap();
        std::fs::write(dir.path().join("uploads/export.json"), "[]").unwrap();

        let store = DirObjectStore::new().with_bucket("exports", dir.path());
        let text = store.fetch("exports", "uploads/export.json").unwrap();
        assert_eq!(text, "[]");
    }

    #[test]
    fn unknown_bucket_fails() {
        let store = DirObjectStore::new();
        let err = store.fetch("nope", "key").unwrap_err();
        assert!(err.to_string().contains("unknown bucket"));
    }

    #[test]
    fn missing_object_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirObjectStore::new().with_bucket("exports", dir.path());
        assert!(store.fetch("exports", "missing.json").is_err());
    }
}
