//! Builders to construct mutexes from a store client and configuration.

pub mod mutex_builder;

pub use mutex_builder::{MutexBuilder, Redcsync};
