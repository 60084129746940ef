//! Chunk and unit types exchanged between producers and consumers.
//!
//! - [`Segment`] - One window produced by the boundary-safe chunker
//! - [`Chunk`] - A tagged segment handed to the matching stage
//! - [`SourceUnit`] - Independently schedulable piece of a source
//! - [`EnumerationResult`] / [`ChunkResult`] - Unit-mode results
//! - [`ChunkHash`] - 32-byte content fingerprint

mod data;
mod hash;
mod segment;
mod unit;

pub use data::{Chunk, SourceMetadata, SourceType};
pub use hash::{ChunkHash, ParseChunkHashError};
pub use segment::Segment;
pub use unit::{
    ChunkResult, CommonSourceUnit, CommonSourceUnitUnmarshaller, EnumerationResult, SourceUnit,
};
