use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tracing::info;

/// Sink notified once per simulated study.
///
/// Reporting is purely observational and never affects results. Sinks are
/// shared across worker threads, so `advance` takes `&self`.
pub trait Progress: Sync {
    /// Records that `by` more studies have been simulated
    fn advance(&self, by: usize);
}

/// Progress sink that discards all updates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    #[inline]
    fn advance(&self, _by: usize) {}
}

/// Progress sink that logs every completed tenth of a batch
#[derive(Debug)]
pub struct LogProgress {
    total: usize,
    done: AtomicUsize,
}

impl LogProgress {
    /// Creates a ticker for a batch of `total` studies
    pub const fn new(total: usize) -> Self {
        Self {
            total,
            done: AtomicUsize::new(0),
        }
    }

    /// Returns the number of studies recorded so far
    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}

impl Progress for LogProgress {
    fn advance(&self, by: usize) {
        if self.total == 0 || by == 0 {
            return;
        }
        let before = self.done.fetch_add(by, Ordering::Relaxed);
        let after = before + by;
        let decile = |done: usize| done.min(self.total) * 10 / self.total;
        if decile(after) > decile(before) {
            info!(
                done = after.min(self.total),
                total = self.total,
                "simulated {}% of studies",
                decile(after) * 10
            );
        }
    }
}

/// Cancellation query polled by a running batch.
pub trait AbortSignal: Sync {
    /// Returns `true` if the batch should stop
    fn should_abort(&self) -> bool;
}

/// Abort signal that never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverAbort;

impl AbortSignal for NeverAbort {
    #[inline]
    fn should_abort(&self) -> bool {
        false
    }
}

impl<F> AbortSignal for F
where
    F: Fn() -> bool + Sync,
{
    fn should_abort(&self) -> bool {
        self()
    }
}

/// Shared cancellation flag
///
/// Clones observe the same flag, so one handle can be given to a running
/// batch and another kept to cancel it.
///
/// # Examples
///
/// ```
/// use fastpos::{AbortSignal, CancelToken};
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// assert!(!token.should_abort());
///
/// handle.cancel();
/// assert!(token.should_abort());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that has not been cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl AbortSignal for CancelToken {
    fn should_abort(&self) -> bool {
        self.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_progress_counts_studies() {
        let progress = LogProgress::new(25);
        (0..25).for_each(|_| progress.advance(1));
        assert_eq!(progress.done(), 25);

        let empty = LogProgress::new(0);
        empty.advance(3);
        assert_eq!(empty.done(), 0);
    }

    #[test]
    fn closures_act_as_abort_signals() {
        let never = || false;
        let always = || true;
        assert!(!never.should_abort());
        assert!(always.should_abort());
        assert!(!NeverAbort.should_abort());
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
        assert!(other.should_abort());
    }
}
