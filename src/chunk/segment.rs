//! The Segment type - one overlapping window over a byte stream.

use bytes::Bytes;
use std::fmt;

/// A window produced by the boundary-safe chunker.
///
/// `data` is the primary region (bytes consumed from the stream) followed by
/// the overlap region (bytes peeked from the immediately following stream
/// position). The overlap of one segment is the start of the next segment's
/// primary region.
///
/// # Example
///
/// ```
/// use chunkfeed::Segment;
/// use bytes::Bytes;
///
/// let segment = Segment::new(Bytes::from_static(b"hello world"), 0, 5);
/// assert_eq!(&segment.primary()[..], b"hello");
/// assert_eq!(&segment.overlap()[..], b" world");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Primary bytes followed by the peeked overlap.
    pub data: Bytes,

    /// Offset of the first primary byte in the original stream.
    pub offset: u64,

    /// Number of leading bytes in `data` that were consumed from the stream.
    pub primary_len: usize,
}

impl Segment {
    /// Creates a new segment.
    ///
    /// `primary_len` is clamped to `data.len()`.
    pub fn new(data: impl Into<Bytes>, offset: u64, primary_len: usize) -> Self {
        let data = data.into();
        let primary_len = primary_len.min(data.len());
        Self {
            data,
            offset,
            primary_len,
        }
    }

    /// Returns the total length (primary + overlap).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the segment has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the consumed region, zero-copy.
    pub fn primary(&self) -> Bytes {
        self.data.slice(..self.primary_len)
    }

    /// Returns the peeked region, zero-copy.
    pub fn overlap(&self) -> Bytes {
        self.data.slice(self.primary_len..)
    }

    /// Returns the end offset of the primary region (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.primary_len as u64
    }

    /// Returns the stream range covered by the primary region.
    pub fn range(&self) -> std::ops::Range<u64> {
        self.offset..self.end()
    }

    /// Consumes the segment and returns the underlying data.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Segment({} bytes @ {}, overlap {})",
            self.primary_len,
            self.offset,
            self.len() - self.primary_len
        )
    }
}
