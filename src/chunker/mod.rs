//! Boundary-safe chunk producer.
//!
//! - [`Chunker`] - Holds the read/peek configuration
//! - [`ChunkIter`] - Iterator yielding overlapping segments from a [`std::io::Read`]

mod engine;

pub use engine::{ChunkIter, Chunker};
