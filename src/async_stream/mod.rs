//! Async boundary-safe chunking.
//!
//! Runtime-agnostic: built on `futures-io::AsyncRead`, so it works with
//! tokio (through `tokio_util::compat`), async-std, smol and others.
//!
//! - [`segments_async`] - Creates a stream of overlapping segments
//!
//! This module requires the `async-io` feature to be enabled.

mod stream;

pub use stream::{SegmentStream, segments_async};
