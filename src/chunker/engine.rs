//! Boundary-safe chunking engine - Chunker and ChunkIter.
//!
//! Each emitted [`Segment`] holds up to `read_size` consumed bytes followed by
//! up to `peek_size` bytes read ahead from the immediately following stream
//! position. The next segment starts exactly where the previous consumed
//! region ended, so consecutive segments overlap by the peeked bytes and any
//! run of at most `peek_size` bytes lands whole in at least one segment.
//!
//! # Example
//!
//! ```
//! use chunkfeed::{ChunkConfig, Chunker};
//! use std::io::Cursor;
//!
//! let chunker = Chunker::new(ChunkConfig::new(8, 4)?);
//! let segments = chunker
//!     .chunk(Cursor::new(&b"0123456789abcdefXYZ"[..]))
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! assert_eq!(&segments[0].data[..], b"0123456789ab");
//! assert_eq!(&segments[1].data[..], b"89abcdefXYZ");
//! assert_eq!(&segments[2].data[..], b"XYZ");
//! # Ok::<(), chunkfeed::Error>(())
//! ```

use std::io::Read;

use bytes::Bytes;

use crate::buffer::{Buffer, DEFAULT_BUFFER_SIZE};
use crate::chunk::Segment;
use crate::config::ChunkConfig;
use crate::error::Error;

/// Produces overlapping segments from byte streams.
///
/// `Chunker` only holds a configuration; it is cheap to copy and can be
/// shared by every file a source scans.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    /// Creates a new chunker with the given configuration.
    ///
    /// Sizes left out of range by the unvalidated builder setters are
    /// clamped: both to at least 1, their sum to at most
    /// [`MAX_CHUNK_LEN`](crate::MAX_CHUNK_LEN).
    pub fn new(config: ChunkConfig) -> Self {
        Self {
            config: config.clamped(),
        }
    }

    /// Returns the configuration used by this chunker.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Creates a segment iterator over a reader.
    ///
    /// The iterator lazily reads from `reader`; it ends after the stream is
    /// exhausted or after the first read error, which is yielded once.
    pub fn chunk<R: Read>(&self, reader: R) -> ChunkIter<R> {
        ChunkIter::new(reader, self.config)
    }

    /// Chunks an in-memory buffer.
    ///
    /// Segments are zero-copy slices of `data`.
    ///
    /// ```
    /// use chunkfeed::{ChunkConfig, Chunker};
    ///
    /// let chunker = Chunker::new(ChunkConfig::new(4, 2)?);
    /// let segments = chunker.chunk_bytes(&b"abcdefghij"[..]);
    ///
    /// let data: Vec<&[u8]> = segments.iter().map(|s| &s.data[..]).collect();
    /// assert_eq!(data, vec![&b"abcdef"[..], &b"efghij"[..], &b"ij"[..]]);
    /// # Ok::<(), chunkfeed::Error>(())
    /// ```
    pub fn chunk_bytes(&self, data: impl Into<Bytes>) -> Vec<Segment> {
        let data = data.into();
        let read_size = self.config.read_size();
        let peek_size = self.config.peek_size();

        let mut segments = Vec::with_capacity(data.len().div_ceil(read_size));
        let mut start = 0usize;
        while start < data.len() {
            let primary_end = start.saturating_add(read_size).min(data.len());
            let end = primary_end.saturating_add(peek_size).min(data.len());
            segments.push(Segment::new(
                data.slice(start..end),
                start as u64,
                primary_end - start,
            ));
            start = primary_end;
        }
        segments
    }
}

/// An iterator that yields overlapping segments from a reader.
///
/// Before every emission the window is filled to `read_size + peek_size`
/// bytes (or to end-of-stream); short reads from the underlying reader never
/// shrink the overlap.
pub struct ChunkIter<R> {
    reader: R,
    config: ChunkConfig,
    window: Buffer,
    offset: u64,
    eof: bool,
    finished: bool,
}

impl<R: Read> ChunkIter<R> {
    fn new(reader: R, config: ChunkConfig) -> Self {
        Self {
            reader,
            config,
            // Grows with what is actually read; large configs over short
            // inputs never allocate the full window.
            window: Buffer::take(config.max_chunk_len().min(DEFAULT_BUFFER_SIZE)),
            offset: 0,
            eof: false,
            finished: false,
        }
    }

    /// Returns the stream offset of the next segment's first consumed byte.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Reads until the window is full or the stream ends.
    fn fill_window(&mut self) -> Result<(), Error> {
        let target = self.config.max_chunk_len();
        if self.eof || self.window.len() >= target {
            return Ok(());
        }

        // `read_to_end` retries `Interrupted` and only grows the window by
        // the bytes it receives.
        let want = target - self.window.len();
        let read = (&mut self.reader)
            .take(want as u64)
            .read_to_end(&mut self.window)?;
        if read < want {
            self.eof = true;
        }
        Ok(())
    }

    fn emit_segment(&mut self) -> Segment {
        let primary_len = self.config.read_size().min(self.window.len());
        let data = Bytes::copy_from_slice(&self.window);
        let segment = Segment::new(data, self.offset, primary_len);

        // Peeked bytes stay in the window and become the next primary region.
        self.window.drain(..primary_len);
        self.offset += primary_len as u64;
        segment
    }
}

impl<R: Read> Iterator for ChunkIter<R> {
    type Item = Result<Segment, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if let Err(e) = self.fill_window() {
            self.finished = true;
            return Some(Err(e));
        }

        if self.window.is_empty() {
            self.finished = true;
            return None;
        }

        Some(Ok(self.emit_segment()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    /// Returns at most `step` bytes per read.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    /// Yields `good` bytes, then fails.
    struct Failing {
        good: usize,
    }

    impl Read for Failing {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.good == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
            }
            let n = self.good.min(buf.len());
            buf[..n].fill(b'x');
            self.good -= n;
            Ok(n)
        }
    }

    fn small() -> Chunker {
        Chunker::new(ChunkConfig::new(8, 3).unwrap())
    }

    #[test]
    fn test_empty_stream() {
        let segments: Vec<_> = small().chunk(Cursor::new(Vec::new())).collect();
        assert!(segments.is_empty());
        assert!(small().chunk_bytes(Bytes::new()).is_empty());
    }

    #[test]
    fn test_single_short_segment() {
        let segments = small()
            .chunk(Cursor::new(b"abc".to_vec()))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(&segments[0].data[..], b"abc");
        assert_eq!(segments[0].primary_len, 3);
    }

    #[test]
    fn test_overlap_is_next_primary_start() {
        let data: Vec<u8> = (0u8..30).collect();
        let segments = small()
            .chunk(Cursor::new(data.clone()))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        for pair in segments.windows(2) {
            let overlap = pair[0].overlap();
            assert!(pair[1].data.starts_with(&overlap));
            assert_eq!(pair[0].end(), pair[1].offset);
        }
        assert_eq!(segments.last().map(|s| s.end()), Some(30));
    }

    #[test]
    fn test_short_reads_keep_full_windows() {
        let data: Vec<u8> = (0..100).map(|i| (i % 256) as u8).collect();
        let trickled = small()
            .chunk(Trickle {
                data: &data,
                step: 1,
            })
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let whole = small().chunk_bytes(data.clone());
        assert_eq!(trickled, whole);
    }

    #[test]
    fn test_marker_across_read_boundary() {
        let mut data = vec![b'.'; 20];
        data[6..9].copy_from_slice(b"KEY");
        let segments = small().chunk_bytes(data);
        assert!(!segments[0].primary().windows(3).any(|w| w == b"KEY"));
        assert!(segments.iter().any(|s| s.data.windows(3).any(|w| w == b"KEY")));
    }

    #[test]
    fn test_read_error_is_yielded_once() {
        let mut iter = small().chunk(Failing { good: 5 });
        let first = iter.next().unwrap();
        assert!(matches!(first, Err(Error::Io(_))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_unvalidated_sizes_are_clamped() {
        let huge = ChunkConfig::default()
            .with_read_size(usize::MAX)
            .with_peek_size(1);
        let segments = Chunker::new(huge)
            .chunk(Cursor::new(b"secret".to_vec()))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(&segments[0].data[..], b"secret");

        let zero = ChunkConfig::default().with_read_size(0).with_peek_size(0);
        let segments = Chunker::new(zero).chunk_bytes(&b"abc"[..]);
        assert_eq!(segments.len(), 3);
        assert_eq!(&segments[0].data[..], b"ab");
    }

    #[test]
    fn test_large_window_over_short_input() {
        let config = ChunkConfig::new(crate::MAX_CHUNK_LEN / 2, 3 * 1024).unwrap();
        let iter = Chunker::new(config).chunk(Cursor::new(b"AKIA".to_vec()));
        assert!(iter.window.capacity() <= DEFAULT_BUFFER_SIZE * 2);

        let segments = iter.collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(&segments[0].data[..], b"AKIA");
    }

    #[test]
    fn test_offsets_track_primary_regions() {
        let data = vec![0u8; 50];
        let mut iter = small().chunk(Cursor::new(data));
        let mut expected = 0u64;
        while let Some(segment) = iter.next() {
            let segment = segment.unwrap();
            assert_eq!(segment.offset, expected);
            expected += segment.primary_len as u64;
            assert_eq!(iter.offset(), expected);
        }
        assert_eq!(expected, 50);
    }
}
