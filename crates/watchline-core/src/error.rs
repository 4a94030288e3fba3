//! Common error type for the ingest pipeline

/// Error from running the ingest pipeline over one export blob.
///
/// `Parse` covers malformed export JSON (fatal, propagates to the
/// invocation boundary). `Queue` covers transport failures talking to
/// the work queue; a chunk that is *accepted but partially rejected*
/// is not an error and is reflected in the accepted count instead.
#[derive(Debug)]
pub enum IngestError {
    Parse(serde_json::Error),
    Queue(String),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "export parse: {e}"),
            Self::Queue(msg) => write!(f, "queue: {msg}"),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Queue(_) => None,
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
