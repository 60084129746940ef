//! Resettable reader: try a structured decode first, replay the same bytes
//! for raw chunking if it declines.

use std::io::{self, Read};

use crate::error::{Error, Result};

/// Lifecycle of a [`ResetReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetState {
    /// Every byte read is retained.
    Buffering,
    /// Rewound to the start; retained bytes are served first, new bytes are
    /// still retained.
    Replaying,
    /// Retention stopped. Remaining retained bytes are served once and then
    /// released. `reset` fails from here on.
    ForwardOnly,
}

/// Wraps a reader so the bytes consumed so far can be replayed once.
///
/// Memory grows with the number of bytes read while buffering; [`stop`]
/// drops everything already consumed and frees the rest as it is read.
///
/// # Example
///
/// ```
/// use std::io::Read;
/// use chunkfeed::ResetReader;
///
/// let mut reader = ResetReader::new(&b"PK\x03\x04 not really a zip"[..]);
///
/// let mut magic = [0u8; 4];
/// reader.read_exact(&mut magic)?;
/// // Decoder declines; replay from the start.
/// reader.reset()?;
/// reader.stop();
///
/// let mut all = Vec::new();
/// reader.read_to_end(&mut all)?;
/// assert!(all.starts_with(b"PK\x03\x04"));
/// # Ok::<(), chunkfeed::Error>(())
/// ```
///
/// [`stop`]: ResetReader::stop
#[derive(Debug)]
pub struct ResetReader<R> {
    inner: R,
    retained: Vec<u8>,
    pos: usize,
    state: ResetState,
}

impl<R: Read> ResetReader<R> {
    /// Wraps `inner`, starting in [`ResetState::Buffering`].
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            retained: Vec::new(),
            pos: 0,
            state: ResetState::Buffering,
        }
    }

    /// Rewinds the logical read position to the start of the stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResetAfterStop`] once [`ResetReader::stop`] was called.
    pub fn reset(&mut self) -> Result<()> {
        if self.state == ResetState::ForwardOnly {
            return Err(Error::ResetAfterStop);
        }
        self.pos = 0;
        self.state = ResetState::Replaying;
        Ok(())
    }

    /// Stops retaining bytes and commits to forward-only reads.
    ///
    /// Bytes already consumed are released immediately; retained bytes not
    /// yet re-read are served first and released once drained.
    pub fn stop(&mut self) {
        if self.state == ResetState::ForwardOnly {
            return;
        }
        self.retained.drain(..self.pos);
        self.pos = 0;
        self.retained.shrink_to_fit();
        self.state = ResetState::ForwardOnly;
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> ResetState {
        self.state
    }

    /// Number of bytes currently held in memory.
    pub fn retained_len(&self) -> usize {
        self.retained.len()
    }

    /// Consumes the wrapper, returning the underlying reader.
    ///
    /// Retained bytes that were not yet re-read are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for ResetReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }

        if self.pos < self.retained.len() {
            let n = out.len().min(self.retained.len() - self.pos);
            out[..n].copy_from_slice(&self.retained[self.pos..self.pos + n]);
            self.pos += n;
            if self.state == ResetState::ForwardOnly && self.pos == self.retained.len() {
                self.retained = Vec::new();
                self.pos = 0;
            }
            return Ok(n);
        }

        let n = self.inner.read(out)?;
        if self.state != ResetState::ForwardOnly {
            self.retained.extend_from_slice(&out[..n]);
            self.pos += n;
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reset_replays_consumed_bytes() {
        let mut reader = ResetReader::new(Cursor::new(b"hello world".to_vec()));
        let mut head = [0u8; 5];
        reader.read_exact(&mut head).unwrap();
        assert_eq!(&head, b"hello");

        reader.reset().unwrap();
        assert_eq!(reader.state(), ResetState::Replaying);

        let mut all = Vec::new();
        reader.read_to_end(&mut all).unwrap();
        assert_eq!(all, b"hello world");
    }

    #[test]
    fn test_reset_fails_after_stop() {
        let mut reader = ResetReader::new(&b"abc"[..]);
        reader.stop();
        assert!(matches!(reader.reset(), Err(Error::ResetAfterStop)));
    }

    #[test]
    fn test_stop_releases_consumed_bytes() {
        let mut reader = ResetReader::new(Cursor::new(vec![7u8; 1000]));
        let mut buf = vec![0u8; 600];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(reader.retained_len(), 600);

        reader.reset().unwrap();
        let mut part = vec![0u8; 200];
        reader.read_exact(&mut part).unwrap();
        reader.stop();
        assert_eq!(reader.retained_len(), 400);

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).unwrap();
        assert_eq!(rest.len(), 800);
        assert_eq!(reader.retained_len(), 0);
    }

    #[test]
    fn test_reset_then_stop_yields_full_stream() {
        let data: Vec<u8> = (0..5000).map(|i| (i % 251) as u8).collect();
        let mut reader = ResetReader::new(Cursor::new(data.clone()));
        let mut probe = vec![0u8; 1234];
        reader.read_exact(&mut probe).unwrap();

        reader.reset().unwrap();
        reader.stop();

        let mut all = Vec::new();
        reader.read_to_end(&mut all).unwrap();
        assert_eq!(all, data);
    }

    #[test]
    fn test_forward_only_does_not_retain() {
        let mut reader = ResetReader::new(Cursor::new(vec![1u8; 64]));
        reader.stop();
        let mut buf = [0u8; 32];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(reader.retained_len(), 0);
    }
}
