//! Runtime adapters for callers outside an async context.

pub mod blocking;

pub use blocking::BlockingMutex;
