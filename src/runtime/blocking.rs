//! Blocking facade over the async [`Mutex`].
//!
//! Every method runs one store round trip (or one retry loop) to completion
//! on a private current-thread tokio runtime. Calling these methods from
//! inside another tokio runtime panics. Use the async API there.

use crate::core::{AcquireOptions, Lease, LockError, StoreClient};
use crate::Mutex;

/// Blocking wrapper around a [`Mutex`].
pub struct BlockingMutex<C: StoreClient> {
    inner: Mutex<C>,
    runtime: tokio::runtime::Runtime,
}

impl<C: StoreClient> BlockingMutex<C> {
    /// Wrap `mutex` with its own single-threaded runtime.
    ///
    /// # Errors
    ///
    /// Fails if the runtime cannot be created.
    pub fn new(mutex: Mutex<C>) -> Result<Self, std::io::Error> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            inner: mutex,
            runtime,
        })
    }

    /// The wrapped async mutex.
    pub const fn inner(&self) -> &Mutex<C> {
        &self.inner
    }

    /// Blocking [`Mutex::lock`].
    ///
    /// # Errors
    ///
    /// See [`Mutex::lock`].
    pub fn lock(&self) -> Result<Lease, LockError> {
        self.runtime.block_on(self.inner.lock())
    }

    /// Blocking [`Mutex::lock_with`].
    ///
    /// # Errors
    ///
    /// See [`Mutex::lock_with`].
    pub fn lock_with(&self, opts: &AcquireOptions) -> Result<Lease, LockError> {
        self.runtime.block_on(self.inner.lock_with(opts))
    }

    /// Blocking [`Mutex::unlock`].
    ///
    /// # Errors
    ///
    /// See [`Mutex::unlock`].
    pub fn unlock(&self, lease: &Lease) -> Result<bool, LockError> {
        self.runtime.block_on(self.inner.unlock(lease))
    }

    /// Blocking [`Mutex::extend`].
    ///
    /// # Errors
    ///
    /// See [`Mutex::extend`].
    pub fn extend(&self, lease: &Lease) -> Result<bool, LockError> {
        self.runtime.block_on(self.inner.extend(lease))
    }
}
