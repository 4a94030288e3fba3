//! Watchline Store - Filesystem-backed collaborators for the pipeline
//!
//! The pipeline core is pure; this crate supplies its external
//! collaborators against local storage: the raw export blobs (bucket
//! name → directory), the global video-id snapshot, the per-file
//! status records, the work queue, and the secondary notify queue.

pub mod object;
pub mod queue;
pub mod snapshot;
pub mod status;

// Re-exports for convenience
pub use object::DirObjectStore;
pub use queue::{FifoNotify, JsonlQueue};
pub use snapshot::{MissingSnapshot, SnapshotStore};
pub use status::{FileStatus, StatusStore};
