//! Store client contracts.
//!
//! The lock protocol needs three primitives from the store, all against the
//! node that owns the lock's key:
//!
//! - `ACQUIRE(key, token, ttl)`: set if absent, with expiry
//! - `RELEASE(key, token)`: [`RELEASE_SCRIPT`](crate::core::RELEASE_SCRIPT)
//! - `RENEW(key, token, ttl)`: [`RENEW_SCRIPT`](crate::core::RENEW_SCRIPT)
//!
//! A [`StoreClient`] hands out one [`StoreConnection`] per operation, routed
//! by key. The connection is returned to its pool when dropped, so every exit
//! path of an operation releases it.

use std::time::Duration;

use async_trait::async_trait;

use crate::core::{AtomicScript, StoreError};

/// Factory of key-routed connections.
#[async_trait]
pub trait StoreClient: Send + Sync + 'static {
    /// Connection type handed out per operation.
    type Connection: StoreConnection;

    /// Borrow a connection bound to the node that owns `key`.
    ///
    /// Calls for the same key must always reach the same authoritative node.
    async fn connection(&self, key: &str) -> Result<Self::Connection, StoreError>;
}

/// A borrowed, key-routed execution context. Dropping it releases it.
#[async_trait]
pub trait StoreConnection: Send {
    /// Set `key = value` only if `key` does not exist, expiring after `ttl`.
    ///
    /// Returns `true` iff the set took effect.
    async fn set_if_absent(
        &mut self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError>;

    /// Run `script` atomically against `key` and return its integer status.
    async fn eval(
        &mut self,
        script: &AtomicScript,
        key: &str,
        args: &[String],
    ) -> Result<i64, StoreError>;
}

/// Shortest lease TTL: stores take whole milliseconds and reject `PX 0`.
pub const MIN_TTL: Duration = Duration::from_millis(1);

/// Longest lease TTL: stores take a signed 64-bit millisecond count.
pub const MAX_TTL: Duration = Duration::from_millis(9_223_372_036_854_775_807);

/// Reject a lease TTL the store cannot represent.
pub(crate) fn check_ttl(ttl: Duration) -> Result<(), String> {
    if ttl < MIN_TTL {
        return Err(format!("expiry must be at least 1ms, got {ttl:?}"));
    }
    if ttl > MAX_TTL {
        return Err(format!("expiry must not exceed {}ms", MAX_TTL.as_millis()));
    }
    Ok(())
}

/// Milliseconds for a store TTL argument, saturating on overflow.
pub(crate) fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}
