//! Error types for chunkfeed.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring sources or producing chunks.
///
/// End-of-stream is never represented here: a reader returning `Ok(0)` simply
/// ends chunking.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred while reading input data.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// The connection payload handed to `init` could not be interpreted.
    #[error("error unmarshalling connection: {0}")]
    Connection(#[source] serde_json::Error),

    /// An externally supplied source unit could not be decoded.
    #[error("error unmarshalling source unit: {0}")]
    UnitDecode(#[source] serde_json::Error),

    /// A filter pattern failed to compile.
    #[error("invalid filter pattern {pattern:?}: {source}")]
    InvalidFilter {
        /// The offending pattern.
        pattern: String,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// The source was used before `init` succeeded.
    #[error("source is not initialized")]
    NotInitialized,

    /// `init` was called on an already initialized source.
    #[error("source is already initialized")]
    AlreadyInitialized,

    /// The context was cancelled.
    #[error("context cancelled")]
    Cancelled,

    /// The receiving side of an output channel was dropped.
    #[error("output channel closed")]
    ChannelClosed,

    /// `ResetReader::reset` was called after buffering stopped.
    #[error("cannot reset reader after buffering was stopped")]
    ResetAfterStop,

    /// A source unit could not be chunked. The detailed cause was sent on
    /// the result channel.
    #[error("unit {unit:?} failed: {message}")]
    UnitFailed {
        /// ID of the failed unit.
        unit: String,
        /// Rendered cause.
        message: String,
    },

    /// The path is not a regular file.
    #[error("not a regular file: {}", path.display())]
    NotRegularFile {
        /// The path that was rejected.
        path: PathBuf,
    },

    /// The path cannot be represented as a UTF-8 unit ID.
    #[error("path is not valid UTF-8: {}", path.display())]
    NonUtf8Path {
        /// The configured path.
        path: PathBuf,
    },

    /// Unable to get file info.
    #[error("unable to get file info for {}: {source}", path.display())]
    Stat {
        /// The path that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Unable to open a file.
    #[error("unable to open file {}: {source}", path.display())]
    Open {
        /// The path that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Whether the error should abort the whole job rather than one item.
    ///
    /// Cancellation and a vanished consumer are fatal; everything else is
    /// scoped to a single file, path or unit.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Cancelled
                | Error::ChannelClosed
                | Error::NotInitialized
                | Error::AlreadyInitialized
                | Error::Connection(_)
        )
    }
}
