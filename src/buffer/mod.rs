//! Stream buffering.
//!
//! - [`ResetReader`] - Replay-once reader used to fall back from a structured
//!   decode attempt to raw chunking
//! - `Buffer` - Thread-local pooled window buffers for the chunker (internal)

mod pool;
mod reset;

pub(crate) use pool::{Buffer, DEFAULT_BUFFER_SIZE};
pub use reset::{ResetReader, ResetState};
