//! # redcsync
//!
//! Distributed mutual-exclusion locks on top of a clustered key-value store.
//!
//! Independent processes coordinate exclusive access to a named resource
//! through the store alone: the store cluster is the lock authority, there is
//! no coordinator process of our own.
//!
//! ## How a lock works
//!
//! - **Lease**: holding lock `name` means the store has `name = token` with a
//!   TTL. A crashed holder blocks others for at most that TTL.
//! - **Token**: 128 random bits per `lock` call, base-64 encoded. Only the
//!   holder of the token can release or extend the lease.
//! - **Retry**: `lock` makes up to `tries` set-if-absent attempts with a
//!   pluggable [`DelayStrategy`](core::DelayStrategy) between them.
//! - **Atomic scripts**: release and extend compare the token and mutate the
//!   key in a single store-side script.
//!
//! ## Guarantees and limits
//!
//! At most one lease per name is live at any instant, as long as the store
//! cluster is the single authority for the name. There is no fairness among
//! waiters, no quorum across independent stores, and no fencing beyond the
//! token: a holder paused past its TTL can be superseded without noticing.
//!
//! ## Example
//!
//! ```rust,ignore
//! use redcsync::{ClusterConfig, RedisClusterStore, Redcsync};
//!
//! let store = RedisClusterStore::new(&ClusterConfig::from_env()?)?;
//! let rs = Redcsync::new(store);
//! let mutex = rs.new_mutex("mutex:{10}:lock").build()?;
//!
//! let lease = mutex.lock().await?;
//! // critical section
//! mutex.unlock(&lease).await?;
//! ```
//!
//! [`InMemoryStore`] implements the same contract in process and is what the
//! test suite runs against.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Lock protocol building blocks: errors, tokens, backoff, scripts, store contracts.
pub mod core;
/// Configuration models for mutexes and the store cluster.
pub mod config;
/// Factory and builders for named mutexes.
pub mod builders;
/// Store backends (in-memory, Redis Cluster).
pub mod infra;
/// The distributed mutex.
pub mod mutex;
/// Blocking adapters.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use builders::{MutexBuilder, Redcsync};
pub use config::{ClusterConfig, MutexConfig};
pub use crate::core::{
    AcquireOptions, CancelHandle, ConstantDelay, DelayStrategy, Lease, LockError, RandomToken,
    StoreClient, StoreConnection, StoreError, TokenGenerator,
};
pub use infra::InMemoryStore;
#[cfg(feature = "redis-cluster")]
pub use infra::RedisClusterStore;
pub use mutex::Mutex;
pub use runtime::BlockingMutex;
