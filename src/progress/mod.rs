//! Scan progress owned by each source instance.
//!
//! The scanning thread updates [`Progress`]; a reporter on another thread
//! reads immutable [`ProgressSnapshot`]s.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// A point-in-time copy of a source's progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Completion in percent, derived from the section counters.
    pub percent_complete: i64,
    /// Public facing description of the current step.
    pub message: String,
    /// Opaque token needed to resume an interrupted job.
    pub encoded_resume_info: String,
    /// Sections done so far.
    pub sections_completed: i32,
    /// Total sections in scope.
    pub sections_remaining: i32,
}

/// Mutex-guarded job progress.
#[derive(Debug, Default)]
pub struct Progress {
    state: Mutex<ProgressSnapshot>,
}

impl Progress {
    /// Creates an empty progress record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `i` of `scope` top-level items have been reached.
    ///
    /// `message` and `encoded_resume_info` are stored as given. Percent is
    /// `100 * i / scope`; `i == 0 && scope == 0` means there is nothing to
    /// process and reports 100.
    ///
    /// ```
    /// use chunkfeed::Progress;
    ///
    /// let progress = Progress::new();
    /// progress.set_progress_complete(1, 4, "Path: a", "");
    /// assert_eq!(progress.snapshot().percent_complete, 25);
    /// ```
    pub fn set_progress_complete(
        &self,
        i: usize,
        scope: usize,
        message: impl Into<String>,
        encoded_resume_info: impl Into<String>,
    ) {
        let mut state = self.lock();

        state.message = message.into();
        state.encoded_resume_info = encoded_resume_info.into();
        state.sections_completed = saturating_i32(i);
        state.sections_remaining = saturating_i32(scope);

        state.percent_complete = if i == 0 && scope == 0 {
            100
        } else if scope == 0 {
            0
        } else {
            ((i as f64 / scope as f64) * 100.0) as i64
        };
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.lock().clone()
    }

    // A panicked writer leaves plain data behind; keep reporting it.
    fn lock(&self) -> MutexGuard<'_, ProgressSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn saturating_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_zero_of_zero_is_complete() {
        let progress = Progress::new();
        progress.set_progress_complete(0, 0, "m", "");
        assert_eq!(progress.snapshot().percent_complete, 100);
    }

    #[test]
    fn test_percent_is_derived() {
        let progress = Progress::new();
        progress.set_progress_complete(1, 4, "m", "");
        let snap = progress.snapshot();
        assert_eq!(snap.percent_complete, 25);
        assert_eq!(snap.sections_completed, 1);
        assert_eq!(snap.sections_remaining, 4);
        assert_eq!(snap.message, "m");
    }

    #[test]
    fn test_percent_truncates() {
        let progress = Progress::new();
        progress.set_progress_complete(2, 3, "m", "");
        assert_eq!(progress.snapshot().percent_complete, 66);
    }

    #[test]
    fn test_resume_info_is_stored() {
        let progress = Progress::new();
        progress.set_progress_complete(3, 10, "Path: /etc", "token-3");
        assert_eq!(progress.snapshot().encoded_resume_info, "token-3");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let progress = Progress::new();
        progress.set_progress_complete(1, 2, "first", "");
        let snap = progress.snapshot();
        progress.set_progress_complete(2, 2, "second", "");
        assert_eq!(snap.message, "first");
        assert_eq!(progress.snapshot().percent_complete, 100);
    }

    #[test]
    fn test_concurrent_reader() {
        let progress = Arc::new(Progress::new());
        let reader = {
            let progress = Arc::clone(&progress);
            thread::spawn(move || {
                for _ in 0..1000 {
                    let snap = progress.snapshot();
                    assert!((0..=100).contains(&snap.percent_complete));
                }
            })
        };
        for i in 0..=100 {
            progress.set_progress_complete(i, 100, format!("step {i}"), "");
        }
        reader.join().unwrap();
        assert_eq!(progress.snapshot().percent_complete, 100);
    }
}
