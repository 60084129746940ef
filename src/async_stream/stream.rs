//! Async stream adapter for boundary-safe chunking.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use chunkfeed::{segments_async, ChunkConfig};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(reader: R) -> Result<(), chunkfeed::Error> {
//!     let mut stream = segments_async(reader, ChunkConfig::default());
//!
//!     while let Some(segment) = stream.next().await {
//!         let segment = segment?;
//!         println!("segment: {} bytes @ {}", segment.len(), segment.offset);
//!     }
//!     Ok(())
//! }
//! ```

use std::io::ErrorKind;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::buffer::DEFAULT_BUFFER_SIZE;
use crate::chunk::Segment;
use crate::config::ChunkConfig;
use crate::error::Error;

pin_project! {
    /// A stream of overlapping segments read from an async reader.
    ///
    /// Yields exactly the segments [`Chunker::chunk`](crate::Chunker::chunk)
    /// would yield for the same bytes.
    pub struct SegmentStream<R> {
        #[pin]
        reader: R,
        config: ChunkConfig,
        window: Vec<u8>,
        offset: u64,
        eof: bool,
        finished: bool,
    }
}

impl<R> SegmentStream<R> {
    /// Creates a new segment stream from an async reader.
    ///
    /// Out-of-range sizes are clamped as in [`Chunker::new`](crate::Chunker::new).
    pub fn new(reader: R, config: ChunkConfig) -> Self {
        let config = config.clamped();
        Self {
            reader,
            config,
            window: Vec::with_capacity(config.max_chunk_len().min(DEFAULT_BUFFER_SIZE)),
            offset: 0,
            eof: false,
            finished: false,
        }
    }
}

impl<R: AsyncRead> Stream for SegmentStream<R> {
    type Item = Result<Segment, Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.finished {
            return Poll::Ready(None);
        }

        // Fill the window; bytes read before a Pending stay in it.
        let target = this.config.max_chunk_len();
        while !*this.eof && this.window.len() < target {
            // Zero-fill at most one step past what is already held.
            let filled = this.window.len();
            let step = (target - filled).min(DEFAULT_BUFFER_SIZE);
            this.window.resize(filled + step, 0);
            match this.reader.as_mut().poll_read(cx, &mut this.window[filled..]) {
                Poll::Pending => {
                    this.window.truncate(filled);
                    return Poll::Pending;
                }
                Poll::Ready(Ok(0)) => {
                    this.window.truncate(filled);
                    *this.eof = true;
                }
                Poll::Ready(Ok(n)) => this.window.truncate(filled + n),
                Poll::Ready(Err(e)) if e.kind() == ErrorKind::Interrupted => {
                    this.window.truncate(filled);
                }
                Poll::Ready(Err(e)) => {
                    this.window.truncate(filled);
                    *this.finished = true;
                    return Poll::Ready(Some(Err(Error::Io(e))));
                }
            }
        }

        if this.window.is_empty() {
            *this.finished = true;
            return Poll::Ready(None);
        }

        let primary_len = this.config.read_size().min(this.window.len());
        let segment = Segment::new(
            Bytes::copy_from_slice(&this.window[..]),
            *this.offset,
            primary_len,
        );
        this.window.drain(..primary_len);
        *this.offset += primary_len as u64;

        Poll::Ready(Some(Ok(segment)))
    }
}

/// Creates a segment stream from an async reader.
///
/// For tokio readers, convert with `tokio_util::compat`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use chunkfeed::{segments_async, ChunkConfig};
///
/// let file = tokio::fs::File::open("secrets.env").await?;
/// let stream = segments_async(file.compat(), ChunkConfig::default());
/// ```
pub fn segments_async<R: AsyncRead>(reader: R, config: ChunkConfig) -> SegmentStream<R> {
    SegmentStream::new(reader, config)
}
