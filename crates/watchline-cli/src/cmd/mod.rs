pub mod ingest;
pub mod snapshot;
pub mod status;
