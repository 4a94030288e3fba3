//! Watchline Core - Normalization pipeline for watch-history exports
//!
//! This crate turns raw export JSON into deduplicated, ordered work
//! units for a downstream queue: format parsers, ranking, the global
//! video-id dedup gate, and batch building. Storage and queue I/O
//! live behind collaborator traits; the pipeline itself is
//! synchronous and single-pass.

pub mod batch;
pub mod dedup;
pub mod error;
pub mod light;
pub mod logging;
pub mod pipeline;
pub mod queue;
pub mod rank;
pub mod record;
pub mod takeout;

// Re-exports for convenience
pub use batch::{WorkPayload, WorkUnit, build_units};
pub use dedup::{SeenIds, admit_new};
pub use error::IngestError;
pub use logging::init_logging;
pub use pipeline::{Origin, RunMetadata, RunSummary, file_id_from_key, run};
pub use queue::{CHUNK_SIZE, QueueSink, send_in_chunks};
pub use record::{Category, OccurredAt, Record};
