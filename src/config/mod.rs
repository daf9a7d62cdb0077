//! Configuration models for mutexes and the store cluster.

pub mod cluster;
pub mod mutex;

pub use cluster::ClusterConfig;
pub use mutex::MutexConfig;

/// Non-empty environment variable value.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
