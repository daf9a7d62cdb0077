//! Error types for lock operations and the store layer beneath them.

use thiserror::Error;

/// Failures raised by a store client while reaching or talking to the node
/// that owns a key.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The owning node could not be reached (connect, I/O, timeout).
    #[error("store unreachable: {0}")]
    Unreachable(String),
    /// The key could not be bound to its owning node.
    #[error("routing error: {0}")]
    Routing(String),
    /// The store answered with something the protocol does not expect.
    #[error("unexpected reply: {0}")]
    Protocol(String),
    /// Backend-specific failure with context.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Errors produced by [`Mutex`](crate::Mutex) operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// The entropy source failed; no acquisition attempt was made.
    #[error("failed to generate lock token: {0}")]
    TokenGeneration(String),
    /// Every configured attempt ran without acquiring the lock.
    #[error("acquire lock timeout: `{name}` not acquired after {tries} attempt(s)")]
    AcquisitionTimeout {
        /// Lock name.
        name: String,
        /// Number of attempts made.
        tries: u32,
    },
    /// The store could not be reached or routed to while running `op` on `key`.
    #[error("{op} `{key}`: {source}")]
    Transport {
        /// Operation being performed (`unlock`, `extend`).
        op: &'static str,
        /// Lock name the operation targeted.
        key: String,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },
    /// Reserved. No code path produces this yet.
    #[error("failed to acquire lock")]
    OperationFailed,
    /// The caller cancelled an in-flight acquisition.
    #[error("lock acquisition cancelled")]
    Cancelled,
    /// The caller's deadline passed before the lock was acquired.
    #[error("lock acquisition deadline exceeded")]
    DeadlineExceeded,
    /// Mutex configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LockError {
    /// Wrap a store failure with the operation and key it happened on.
    pub(crate) fn transport(op: &'static str, key: &str, source: StoreError) -> Self {
        Self::Transport {
            op,
            key: key.to_owned(),
            source,
        }
    }

    /// Returns `true` for the non-exceptional outcome of losing contention.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::AcquisitionTimeout { .. })
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
