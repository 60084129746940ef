//! Structured content handlers (archives, compressed files, ...).

use std::io::Read;

use crossbeam_channel::Sender;

use crate::chunk::Chunk;
use crate::context::Context;

/// Decodes structured content and emits chunks for it.
///
/// Sources offer every file to their handler before raw chunking. The
/// reader is a fresh [`ResetReader`](crate::ResetReader) positioned at the
/// start of the file; a handler may read any amount and still decline, in
/// which case the source rewinds and chunks the raw bytes.
pub trait ContentHandler: Send + Sync {
    /// Returns `true` if the file was fully handled and its chunks sent.
    ///
    /// Emitted chunks should be built with `template.with_data(..)` so they
    /// carry the source's tags.
    fn handle_file(
        &self,
        ctx: &Context,
        reader: &mut dyn Read,
        template: &Chunk,
        chunks: &Sender<Chunk>,
    ) -> bool;
}

/// Declines every file.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl ContentHandler for NoopHandler {
    fn handle_file(&self, _: &Context, _: &mut dyn Read, _: &Chunk, _: &Sender<Chunk>) -> bool {
        false
    }
}
