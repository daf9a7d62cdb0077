//! Core lock protocol building blocks: errors, tokens, backoff, scripts,
//! store contracts, leases and cancellation.

pub mod cancel;
pub mod error;
pub mod lease;
pub mod retry;
pub mod script;
pub mod store;
pub mod token;

pub use cancel::{AcquireOptions, CancelHandle};
pub use error::{AppResult, LockError, StoreError};
pub use lease::Lease;
pub use retry::{max_wait, ConstantDelay, DelayStrategy, DEFAULT_RETRY_DELAY};
pub use script::{AtomicScript, ScriptKind, RELEASE_SCRIPT, RENEW_SCRIPT};
pub use store::{StoreClient, StoreConnection, MAX_TTL, MIN_TTL};
pub use token::{random_token, RandomToken, TokenGenerator, TOKEN_BYTES};
