//! Configuration for chunking behavior.
//!
//! - [`ChunkConfig`] - Read granularity and overlap window
//!
//! # Example
//!
//! ```
//! use chunkfeed::ChunkConfig;
//!
//! // Custom sizes
//! let config = ChunkConfig::new(4096, 512)?;
//!
//! // Builder pattern
//! let config = ChunkConfig::default().with_peek_size(4 * 1024);
//! # Ok::<(), chunkfeed::Error>(())
//! ```

use crate::error::{Error, Result};

/// Default read granularity (10 KiB).
pub const DEFAULT_READ_SIZE: usize = 10 * 1024;

/// Default overlap window (3 KiB).
///
/// The largest known credential (a GCP service account key) is about 2.25 KiB,
/// so a 3 KiB peek keeps every credential intact in at least one chunk.
pub const DEFAULT_PEEK_SIZE: usize = 3 * 1024;

/// Upper bound on `read_size + peek_size` (64 MiB).
pub const MAX_CHUNK_LEN: usize = 64 * 1024 * 1024;

/// Configuration for boundary-safe chunking.
///
/// - `read_size` (`B`) - bytes consumed from the stream per chunk
/// - `peek_size` (`P`) - bytes read ahead without consuming and appended to
///   the chunk
///
/// Any run of bytes no longer than `peek_size` is guaranteed to appear whole
/// in at least one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkConfig {
    read_size: usize,
    peek_size: usize,
}

impl ChunkConfig {
    /// Creates a new configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if either size is zero or their sum
    /// exceeds [`MAX_CHUNK_LEN`].
    ///
    /// # Example
    ///
    /// ```
    /// use chunkfeed::ChunkConfig;
    ///
    /// let config = ChunkConfig::new(10 * 1024, 3 * 1024)?;
    /// assert_eq!(config.read_size(), 10 * 1024);
    /// # Ok::<(), chunkfeed::Error>(())
    /// ```
    pub fn new(read_size: usize, peek_size: usize) -> Result<Self> {
        if read_size == 0 {
            return Err(Error::InvalidConfig {
                message: "read_size must be non-zero",
            });
        }
        if peek_size == 0 {
            return Err(Error::InvalidConfig {
                message: "peek_size must be non-zero",
            });
        }
        match read_size.checked_add(peek_size) {
            Some(len) if len <= MAX_CHUNK_LEN => Ok(Self {
                read_size,
                peek_size,
            }),
            _ => Err(Error::InvalidConfig {
                message: "read_size + peek_size exceeds MAX_CHUNK_LEN",
            }),
        }
    }

    /// Sets the read granularity.
    ///
    /// Note: This does not validate the configuration. Use [`ChunkConfig::validate`].
    pub fn with_read_size(mut self, size: usize) -> Self {
        self.read_size = size;
        self
    }

    /// Sets the overlap window.
    ///
    /// Note: This does not validate the configuration. Use [`ChunkConfig::validate`].
    pub fn with_peek_size(mut self, size: usize) -> Self {
        self.peek_size = size;
        self
    }

    /// Returns the read granularity.
    pub fn read_size(&self) -> usize {
        self.read_size
    }

    /// Returns the overlap window.
    pub fn peek_size(&self) -> usize {
        self.peek_size
    }

    /// Largest chunk this configuration can emit.
    pub fn max_chunk_len(&self) -> usize {
        self.read_size.saturating_add(self.peek_size)
    }

    /// Pulls sizes set through the unvalidated builders into the accepted
    /// range: both at least 1, sum at most [`MAX_CHUNK_LEN`].
    pub(crate) fn clamped(self) -> Self {
        let peek_size = self.peek_size.clamp(1, MAX_CHUNK_LEN - 1);
        let read_size = self.read_size.clamp(1, MAX_CHUNK_LEN - peek_size);
        Self {
            read_size,
            peek_size,
        }
    }

    /// Validates the current configuration.
    ///
    /// ```
    /// use chunkfeed::ChunkConfig;
    ///
    /// let config = ChunkConfig::default().with_read_size(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        Self::new(self.read_size, self.peek_size).map(|_| ())
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            read_size: DEFAULT_READ_SIZE,
            peek_size: DEFAULT_PEEK_SIZE,
        }
    }
}
