//! Backoff policies between acquisition attempts.

use std::time::Duration;

/// Default wait between two acquisition attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(150);

/// Decides how long to wait before an acquisition attempt.
///
/// `next` is only consulted for `attempt >= 1`; the first attempt never waits.
/// Implementations must be deterministic for a given index. Any
/// `Fn(u32) -> Duration` closure is a strategy.
pub trait DelayStrategy: Send + Sync {
    /// Wait before attempt number `attempt` (0-based).
    fn next(&self, attempt: u32) -> Duration;
}

impl<F> DelayStrategy for F
where
    F: Fn(u32) -> Duration + Send + Sync,
{
    fn next(&self, attempt: u32) -> Duration {
        self(attempt)
    }
}

/// The same wait before every retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantDelay(pub Duration);

impl Default for ConstantDelay {
    fn default() -> Self {
        Self(DEFAULT_RETRY_DELAY)
    }
}

impl DelayStrategy for ConstantDelay {
    fn next(&self, _attempt: u32) -> Duration {
        self.0
    }
}

/// Total sleep a `lock` call can accumulate with `tries` attempts.
pub fn max_wait(strategy: &dyn DelayStrategy, tries: u32) -> Duration {
    (1..tries).map(|attempt| strategy.next(attempt)).sum()
}
