//! Cooperative cancellation.
//!
//! A [`Context`] is cancelled at most once. Scanning code samples it at
//! path/unit granularity with [`Context::is_done`] and races it against
//! blocking channel sends with [`cancellable_write`]. A file whose read has
//! started is always chunked to the end, so shutdown latency is bounded by
//! the time to scan one file.

use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use crossbeam_channel::{Receiver, Sender, TryRecvError, select};

use crate::error::{Error, Result};

/// Cancellation handle shared by a caller and the sources it drives.
///
/// Cloning is cheap; all clones observe the same cancellation.
///
/// ```
/// use chunkfeed::Context;
///
/// let ctx = Context::new();
/// let worker = ctx.clone();
/// assert!(!worker.is_done());
///
/// ctx.cancel();
/// assert!(worker.is_done());
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    // Dropping the only sender disconnects every `done` receiver.
    cancel: Arc<Mutex<Option<Sender<Infallible>>>>,
    done: Receiver<Infallible>,
}

impl Context {
    /// Creates a context that is not cancelled.
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::bounded(0);
        Self {
            cancel: Arc::new(Mutex::new(Some(tx))),
            done: rx,
        }
    }

    /// Cancels the context. Idempotent.
    pub fn cancel(&self) {
        let sender = self
            .cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(sender);
    }

    /// Reports whether the context has been cancelled.
    pub fn is_done(&self) -> bool {
        matches!(self.done.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// A receiver that becomes ready (disconnected) on cancellation, for use
    /// in `select!`.
    pub fn done(&self) -> &Receiver<Infallible> {
        &self.done
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Sends `item`, giving up if `ctx` is cancelled first.
///
/// # Errors
///
/// - [`Error::Cancelled`] if the context is done before the send completes
/// - [`Error::ChannelClosed`] if the receiver was dropped
pub fn cancellable_write<T>(ctx: &Context, tx: &Sender<T>, item: T) -> Result<()> {
    if ctx.is_done() {
        return Err(Error::Cancelled);
    }
    select! {
        send(tx, item) -> res => res.map_err(|_| Error::ChannelClosed),
        recv(ctx.done()) -> _ => Err(Error::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_cancel_is_idempotent() {
        let ctx = Context::new();
        ctx.cancel();
        ctx.cancel();
        assert!(ctx.is_done());
    }

    #[test]
    fn test_write_delivers() {
        let ctx = Context::new();
        let (tx, rx) = crossbeam_channel::bounded(1);
        cancellable_write(&ctx, &tx, 42).unwrap();
        assert_eq!(rx.recv().unwrap(), 42);
    }

    #[test]
    fn test_write_after_cancel_fails() {
        let ctx = Context::new();
        let (tx, _rx) = crossbeam_channel::bounded(1);
        ctx.cancel();
        assert!(matches!(
            cancellable_write(&ctx, &tx, 1),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn test_blocked_write_unblocks_on_cancel() {
        let ctx = Context::new();
        let (tx, _rx) = crossbeam_channel::bounded::<u8>(0);
        let canceller = {
            let ctx = ctx.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                ctx.cancel();
            })
        };
        let result = cancellable_write(&ctx, &tx, 1);
        canceller.join().unwrap();
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn test_write_to_dropped_receiver() {
        let ctx = Context::new();
        let (tx, rx) = crossbeam_channel::bounded::<u8>(1);
        drop(rx);
        assert!(matches!(
            cancellable_write(&ctx, &tx, 1),
            Err(Error::ChannelClosed)
        ));
    }
}
