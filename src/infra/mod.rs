//! Store backends implementing the key-routed connection contract.

pub mod memory;
#[cfg(feature = "redis-cluster")]
pub mod redis_cluster;

pub use memory::{InMemoryConnection, InMemoryStore};
#[cfg(feature = "redis-cluster")]
pub use redis_cluster::{RedisClusterConnection, RedisClusterStore};
