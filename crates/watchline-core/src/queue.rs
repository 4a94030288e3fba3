//! Work queue contract and delivery chunking

use crate::batch::WorkUnit;
use crate::error::IngestError;

/// Transport chunk size for queue delivery. Chunk boundaries carry no
/// semantic meaning; `position_in_batch` is stamped before chunking.
pub const CHUNK_SIZE: usize = 10;

/// Downstream work queue.
///
/// One call per transport chunk of at most [`CHUNK_SIZE`] units;
/// returns how many of the chunk's units the queue accepted. Partial
/// acceptance is in-band — only a transport failure is an `Err`.
pub trait QueueSink {
    fn send_chunk(&mut self, chunk: &[WorkUnit]) -> Result<usize, IngestError>;
}

/// Send all units in fixed-size chunks, summing accepted counts.
///
/// A chunk that is only partially accepted does not abort the
/// remaining chunks; the shortfall is logged and reflected in the
/// returned total.
pub fn send_in_chunks(
    sink: &mut dyn QueueSink,
    units: &[WorkUnit],
) -> Result<usize, IngestError> {
    let mut accepted = 0;
    for chunk in units.chunks(CHUNK_SIZE) {
        let ok = sink.send_chunk(chunk)?;
        if ok < chunk.len() {
            log::warn!("queue accepted {ok} of {} units in chunk", chunk.len());
        }
        accepted += ok;
    }
    Ok(accepted)
}
