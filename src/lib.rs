//! chunkfeed
//!
//! Boundary-safe chunk production for secret scanning.
//!
//! `chunkfeed` turns arbitrary, possibly very large data sources into a
//! bounded stream of overlapping byte chunks. Consecutive chunks overlap by a
//! peek window sized above the longest credential a matcher recognizes, so no
//! credential-shaped substring is ever split across a chunk boundary.
//!
//! The crate intentionally:
//! - does NOT decide whether a chunk contains a secret
//! - does NOT verify anything over the network
//! - does NOT persist results
//!
//! It produces tagged chunks plus progress and enumeration signals.
//!
//! # Monolithic scan
//!
//! ```no_run
//! use chunkfeed::{Context, FilesystemSource, Source};
//! use serde_json::json;
//!
//! fn main() -> Result<(), chunkfeed::Error> {
//!     let ctx = Context::new();
//!     let mut source = FilesystemSource::new();
//!     source.init(&ctx, "local", 1, 1, false, &json!({ "paths": ["."] }), 1)?;
//!
//!     let (tx, rx) = crossbeam_channel::bounded(64);
//!     std::thread::scope(|s| {
//!         s.spawn(move || {
//!             for chunk in rx {
//!                 println!("{chunk}");
//!             }
//!         });
//!         let result = source.chunks(&ctx, &tx);
//!         drop(tx);
//!         result
//!     })
//! }
//! ```
//!
//! # Unit-based scan
//!
//! Sources that implement [`SourceUnitEnumerator`] and [`SourceUnitChunker`]
//! can be split into units that are chunked (and retried) independently;
//! probe for them with [`Source::as_unit_enumerator`] and
//! [`Source::as_unit_chunker`].
//!
//! # Raw chunking
//!
//! ```
//! use chunkfeed::{ChunkConfig, Chunker};
//!
//! let chunker = Chunker::new(ChunkConfig::new(16, 8)?);
//! let data = b"xxxxxxxxxxxxxAKIAEXAMPLExxxxxxxxxxx";
//! let segments = chunker.chunk_bytes(&data[..]);
//! assert!(segments.iter().any(|s| s.data.windows(8).any(|w| w == b"AKIAEXAM")));
//! # Ok::<(), chunkfeed::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod chunk;
mod chunker;
mod config;
mod context;
mod error;
mod progress;
mod source;

mod hash; // internal blake3 impl
mod util;

#[cfg(feature = "async-io")]
mod async_stream;

//
// Public surface
//

pub use buffer::{ResetReader, ResetState};
pub use chunk::{
    Chunk, ChunkHash, ChunkResult, CommonSourceUnit, CommonSourceUnitUnmarshaller,
    EnumerationResult, ParseChunkHashError, Segment, SourceMetadata, SourceType, SourceUnit,
};
pub use chunker::{ChunkIter, Chunker};
pub use config::{ChunkConfig, DEFAULT_PEEK_SIZE, DEFAULT_READ_SIZE, MAX_CHUNK_LEN};
pub use context::{Context, cancellable_write};
pub use error::{Error, Result};
pub use progress::{Progress, ProgressSnapshot};
pub use source::filesystem::{
    Filter, FilesystemConfig, FilesystemConnection, FilesystemSource, SkippedItem,
};
pub use source::{
    Connection, ContentHandler, NoopHandler, Source, SourceState, SourceUnitChunker,
    SourceUnitEnumerator, SourceUnitUnmarshaller, Validator,
};

#[cfg(feature = "async-io")]
pub use async_stream::{SegmentStream, segments_async};
