//! The value returned by a successful `lock`.

use std::time::Duration;

use tokio::time::Instant;

/// Proof of ownership of a lock, valid until unlocked or expired.
///
/// A lease is immutable. `unlock` and `extend` take it by reference, so one
/// [`Mutex`](crate::Mutex) can hand out leases to many concurrent callers
/// without sharing any mutable token between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lease {
    name: String,
    token: String,
    expiry: Duration,
    acquired_at: Instant,
    attempts: u32,
}

impl Lease {
    pub(crate) const fn new(
        name: String,
        token: String,
        expiry: Duration,
        acquired_at: Instant,
        attempts: u32,
    ) -> Self {
        Self {
            name,
            token,
            expiry,
            acquired_at,
            attempts,
        }
    }

    /// Key the lease is stored under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ownership token stored as the key's value.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// TTL set on acquisition and on every extension.
    #[must_use]
    pub const fn expiry(&self) -> Duration {
        self.expiry
    }

    /// When the acquiring attempt returned.
    #[must_use]
    pub const fn acquired_at(&self) -> Instant {
        self.acquired_at
    }

    /// 1-based index of the attempt that acquired the lock.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }
}
