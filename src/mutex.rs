//! Distributed mutex
//!
//! A [`Mutex`] names a key in the store. Holding the lock means the key exists
//! and its value is the holder's token; the store's TTL bounds how long a
//! crashed holder can block everyone else.
//!
//! # Protocol
//!
//! - `lock` generates one token, then makes up to `tries` attempts of
//!   `SET name token NX PX expiry`, sleeping `delay.next(i)` before attempt
//!   `i > 0`. The first attempt that sets the key wins.
//! - `unlock` deletes the key only if it still holds the lease's token.
//! - `extend` resets the key's TTL only if it still holds the lease's token.
//!
//! The compare-and-act steps run as [`RELEASE_SCRIPT`] and [`RENEW_SCRIPT`],
//! so no other client can act between the comparison and the mutation.
//!
//! A transport error during an acquisition attempt counts as a failed attempt,
//! exactly like contention: the retry loop keeps going and a caller that never
//! reaches the store sees [`LockError::AcquisitionTimeout`].
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use redcsync::{InMemoryStore, Redcsync};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), redcsync::LockError> {
//! let rs = Redcsync::new(InMemoryStore::new());
//! let mutex = rs
//!     .new_mutex("res:1")
//!     .with_expiry(Duration::from_secs(8))
//!     .with_tries(3)
//!     .build()?;
//!
//! let lease = mutex.lock().await?;
//! // critical section
//! assert!(mutex.extend(&lease).await?);
//! assert!(mutex.unlock(&lease).await?);
//! assert!(!mutex.unlock(&lease).await?);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::core::store::ttl_millis;
use crate::core::token::fresh_token;
use crate::core::{
    max_wait, AcquireOptions, DelayStrategy, Lease, LockError, StoreClient, StoreConnection,
    StoreError, TokenGenerator, RELEASE_SCRIPT, RENEW_SCRIPT,
};

/// A distributed mutual exclusion lock bound to one key.
///
/// Cloning is cheap and clones share the store client. The mutex keeps no
/// per-acquisition state: every `lock` returns its own [`Lease`], so one
/// instance can serve concurrent callers.
pub struct Mutex<C: StoreClient> {
    pub(crate) name: String,
    pub(crate) expiry: Duration,
    pub(crate) tries: u32,
    pub(crate) delay: Arc<dyn DelayStrategy>,
    pub(crate) tokens: Arc<dyn TokenGenerator>,
    pub(crate) factor: Option<f64>,
    pub(crate) quorum: Option<u32>,
    pub(crate) client: Arc<C>,
}

impl<C: StoreClient> Clone for Mutex<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            expiry: self.expiry,
            tries: self.tries,
            delay: Arc::clone(&self.delay),
            tokens: Arc::clone(&self.tokens),
            factor: self.factor,
            quorum: self.quorum,
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: StoreClient> fmt::Debug for Mutex<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutex")
            .field("name", &self.name)
            .field("expiry", &self.expiry)
            .field("tries", &self.tries)
            .finish_non_exhaustive()
    }
}

impl<C: StoreClient> Mutex<C> {
    /// Key this mutex locks.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lease TTL set on acquisition and extension.
    #[must_use]
    pub const fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Maximum acquisition attempts per `lock` call.
    #[must_use]
    pub const fn tries(&self) -> u32 {
        self.tries
    }

    /// Reserved drift factor. Not used by the acquisition protocol.
    #[must_use]
    pub const fn factor(&self) -> Option<f64> {
        self.factor
    }

    /// Reserved quorum size. Not used by the acquisition protocol.
    #[must_use]
    pub const fn quorum(&self) -> Option<u32> {
        self.quorum
    }

    /// Upper bound on the time one `lock` call spends sleeping.
    #[must_use]
    pub fn max_wait(&self) -> Duration {
        max_wait(self.delay.as_ref(), self.tries)
    }

    /// Acquire the lock, retrying per the configured policy.
    ///
    /// # Errors
    ///
    /// [`LockError::TokenGeneration`] if no token could be generated, or
    /// [`LockError::AcquisitionTimeout`] once every attempt has failed.
    pub async fn lock(&self) -> Result<Lease, LockError> {
        self.lock_with(&AcquireOptions::default()).await
    }

    /// Acquire the lock, giving up early on cancellation or deadline.
    ///
    /// `opts` is checked before every sleep and every store round trip, and a
    /// sleep ends as soon as the handle is cancelled or the deadline passes.
    ///
    /// # Errors
    ///
    /// As [`lock`](Self::lock), plus [`LockError::Cancelled`] and
    /// [`LockError::DeadlineExceeded`].
    pub async fn lock_with(&self, opts: &AcquireOptions) -> Result<Lease, LockError> {
        let token = fresh_token(self.tokens.as_ref())?;

        for attempt in 0..self.tries {
            if attempt != 0 {
                if let Err(e) = opts.pause(self.delay.next(attempt)).await {
                    info!(name = %self.name, attempt, "lock acquisition aborted: {e}");
                    return Err(e);
                }
            }
            opts.check()?;

            if self.acquire(&token).await {
                debug!(name = %self.name, attempt, "lock acquired");
                return Ok(Lease::new(
                    self.name.clone(),
                    token,
                    self.expiry,
                    Instant::now(),
                    attempt + 1,
                ));
            }
            debug!(name = %self.name, attempt, "lock attempt failed");
        }

        info!(name = %self.name, tries = self.tries, "lock not acquired, attempts exhausted");
        Err(LockError::AcquisitionTimeout {
            name: self.name.clone(),
            tries: self.tries,
        })
    }

    /// Release `lease`.
    ///
    /// Returns `Ok(true)` if the key held the lease's token and was deleted,
    /// `Ok(false)` if it was absent or held by someone else.
    ///
    /// # Errors
    ///
    /// [`LockError::Transport`] if the store could not be reached.
    pub async fn unlock(&self, lease: &Lease) -> Result<bool, LockError> {
        if !self.owns(lease) {
            return Ok(false);
        }
        let status = self
            .run_script("unlock", lease, |mut conn, name, token| async move {
                conn.eval(&RELEASE_SCRIPT, &name, &[token]).await
            })
            .await?;
        debug!(name = %self.name, released = status, "unlock");
        Ok(status)
    }

    /// Reset the TTL of `lease` to the configured expiry.
    ///
    /// Returns `Ok(true)` iff the key still held the lease's token.
    ///
    /// # Errors
    ///
    /// [`LockError::Transport`] if the store could not be reached.
    pub async fn extend(&self, lease: &Lease) -> Result<bool, LockError> {
        if !self.owns(lease) {
            return Ok(false);
        }
        let ttl = ttl_millis(self.expiry).to_string();
        let status = self
            .run_script("extend", lease, |mut conn, name, token| async move {
                conn.eval(&RENEW_SCRIPT, &name, &[token, ttl]).await
            })
            .await?;
        debug!(name = %self.name, extended = status, "extend");
        Ok(status)
    }

    /// A lease minted for another key is never held through this mutex.
    fn owns(&self, lease: &Lease) -> bool {
        if lease.name() == self.name {
            return true;
        }
        debug!(name = %self.name, lease = lease.name(), "lease belongs to another lock");
        false
    }

    /// One `SET NX PX` attempt. Any failure, including transport, is `false`.
    async fn acquire(&self, token: &str) -> bool {
        let mut conn = match self.client.connection(&self.name).await {
            Ok(conn) => conn,
            Err(e) => {
                debug!(name = %self.name, "acquire: no connection: {e}");
                return false;
            }
        };
        match conn.set_if_absent(&self.name, token, self.expiry).await {
            Ok(acquired) => acquired,
            Err(e) => {
                debug!(name = %self.name, "acquire: store error: {e}");
                false
            }
        }
    }

    /// Borrow a connection for the lease's key and run one script on it.
    /// The connection is moved into `call` and dropped when it completes.
    async fn run_script<F, Fut>(
        &self,
        op: &'static str,
        lease: &Lease,
        call: F,
    ) -> Result<bool, LockError>
    where
        F: FnOnce(C::Connection, String, String) -> Fut,
        Fut: Future<Output = Result<i64, StoreError>>,
    {
        let conn = match self.client.connection(&self.name).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(name = %self.name, op, "no connection: {e}");
                return Err(LockError::transport(op, &self.name, e));
            }
        };
        match call(conn, self.name.clone(), lease.token().to_owned()).await {
            Ok(status) => Ok(status != 0),
            Err(e) => {
                warn!(name = %self.name, op, "script failed: {e}");
                Err(LockError::transport(op, &self.name, e))
            }
        }
    }
}
