//! The source contract every connector implements.
//!
//! [`Source`] is the required capability set. Unit-based scanning and config
//! self-checks are optional capabilities, discovered at runtime through the
//! `as_*` probes. They return `None` unless a connector opts in:
//!
//! ```
//! use chunkfeed::{FilesystemSource, Source};
//!
//! let source = FilesystemSource::new();
//! assert!(source.as_unit_enumerator().is_some());
//! assert!(source.as_unit_chunker().is_some());
//! ```
//!
//! A connector without the unit capabilities can only be driven through
//! [`Source::chunks`].

pub mod filesystem;
mod handler;

use crossbeam_channel::Sender;

use crate::chunk::{Chunk, ChunkResult, EnumerationResult, SourceType, SourceUnit};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::progress::ProgressSnapshot;

pub use handler::{ContentHandler, NoopHandler};

/// Opaque, connector-specific connection payload handed to [`Source::init`].
pub type Connection = serde_json::Value;

/// Lifecycle of a source instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceState {
    /// `init` has not succeeded yet.
    #[default]
    Uninitialized,
    /// Ready to scan.
    Initialized,
    /// `chunks` or `enumerate` is running.
    Scanning,
    /// The last scan returned.
    Done,
}

/// A connector that produces chunks from some data location.
pub trait Source: Send + Sync {
    /// Kind of connector, used to match configuration and jobs.
    fn source_type(&self) -> SourceType;

    /// ID used to correlate results with this source.
    fn source_id(&self) -> i64;

    /// ID of the job this source runs under.
    fn job_id(&self) -> i64;

    /// One-time setup.
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`] if `connection` cannot be interpreted
    /// - [`Error::AlreadyInitialized`] on a second call
    #[allow(clippy::too_many_arguments)]
    fn init(
        &mut self,
        ctx: &Context,
        name: &str,
        job_id: i64,
        source_id: i64,
        verify: bool,
        connection: &Connection,
        concurrency: usize,
    ) -> Result<()>;

    /// Drives the whole scan, sending chunks until exhaustion or
    /// cancellation.
    fn chunks(&self, ctx: &Context, chunks: &Sender<Chunk>) -> Result<()>;

    /// Returns a copy of the current progress.
    fn get_progress(&self) -> ProgressSnapshot;

    /// Config self-check capability.
    fn as_validator(&self) -> Option<&dyn Validator> {
        None
    }

    /// Unit enumeration capability.
    fn as_unit_enumerator(&self) -> Option<&dyn SourceUnitEnumerator> {
        None
    }

    /// Per-unit chunking capability.
    fn as_unit_chunker(&self) -> Option<&dyn SourceUnitChunker> {
        None
    }

    /// Capability to rebuild units received from elsewhere.
    fn as_unit_unmarshaller(&self) -> Option<&dyn SourceUnitUnmarshaller> {
        None
    }
}

/// Validates a source's configuration.
pub trait Validator {
    /// Returns every problem found; empty means valid.
    fn validate(&self) -> Vec<Error>;
}

/// Lists an initialized source as units.
pub trait SourceUnitEnumerator: Send + Sync {
    /// Sends one [`EnumerationResult`] per unit.
    ///
    /// Returns an error only on cancellation or a fatal source error;
    /// failures for single items are sent as [`EnumerationResult::Error`].
    fn enumerate(&self, ctx: &Context, units: &Sender<EnumerationResult>) -> Result<()>;
}

/// Chunks one unit at a time.
pub trait SourceUnitChunker: Send + Sync {
    /// Sends zero or more [`ChunkResult`]s for `unit`.
    ///
    /// A failure of the unit itself is sent as [`ChunkResult::Error`] and
    /// returned as [`Error::UnitFailed`]; cancellation and a closed result
    /// channel are returned as-is.
    fn chunk_unit(
        &self,
        ctx: &Context,
        unit: &dyn SourceUnit,
        chunks: &Sender<ChunkResult>,
    ) -> Result<()>;
}

/// Rebuilds units from an external encoding.
pub trait SourceUnitUnmarshaller {
    /// Decodes a unit.
    fn unmarshal_source_unit(&self, data: &[u8]) -> Result<Box<dyn SourceUnit>>;
}
