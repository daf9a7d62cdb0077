//! Cancellation and deadlines for the acquisition loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

use crate::core::LockError;

// Roughly 30 years; used when `wait` overflows the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `now + wait`, saturating at a far-future instant instead of overflowing.
pub(crate) fn deadline_after(now: Instant, wait: Duration) -> Instant {
    now.checked_add(wait).unwrap_or_else(|| now + FAR_FUTURE)
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Shared flag that aborts in-flight `lock_with` calls.
///
/// Clones observe the same flag. Cancellation is permanent.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    state: Arc<CancelState>,
}

impl CancelHandle {
    /// Create an un-cancelled handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every acquisition observing this handle and wake sleeping ones.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        self.state.notify.notify_waiters();
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once the handle is cancelled.
    pub async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel is not missed.
            let notified = self.state.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Bounds on a single `lock_with` call.
#[derive(Debug, Clone, Default)]
pub struct AcquireOptions {
    deadline: Option<Instant>,
    cancel: Option<CancelHandle>,
}

impl AcquireOptions {
    /// No deadline, no cancellation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up once `deadline` passes.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Give up `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Abort when `handle` is cancelled.
    #[must_use]
    pub fn with_cancel(mut self, handle: CancelHandle) -> Self {
        self.cancel = Some(handle);
        self
    }

    /// Configured deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail if the call was cancelled or its deadline has passed.
    pub(crate) fn check(&self) -> Result<(), LockError> {
        if self.cancel.as_ref().is_some_and(CancelHandle::is_cancelled) {
            return Err(LockError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(LockError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Sleep for `wait`, capped at the deadline and cut short by cancellation.
    pub(crate) async fn pause(&self, wait: Duration) -> Result<(), LockError> {
        self.check()?;
        let mut until = deadline_after(Instant::now(), wait);
        if let Some(deadline) = self.deadline {
            until = until.min(deadline);
        }
        let cancelled = async {
            match &self.cancel {
                Some(handle) => handle.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            () = tokio::time::sleep_until(until) => {}
            () = cancelled => return Err(LockError::Cancelled),
        }
        self.check()
    }
}
