//! Store cluster connection settings.

use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::config::env_var;
use crate::core::AppResult;

/// Where the store cluster lives and how long to wait when connecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Startup nodes, e.g. `redis://10.0.0.1:7000`.
    pub nodes: Vec<String>,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

impl ClusterConfig {
    /// Configuration for the given startup nodes with the default timeout.
    pub fn new<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }

    /// Connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("at least one cluster node must be defined".into());
        }
        if let Some(blank) = self.nodes.iter().position(|n| n.trim().is_empty()) {
            return Err(format!("cluster node #{blank} is blank"));
        }
        if self.connect_timeout_ms == 0 {
            return Err("connect_timeout_ms must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse cluster configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read `REDCSYNC_CLUSTER_NODES` (comma-separated, required) and
    /// `REDCSYNC_CONNECT_TIMEOUT_MS` after loading `.env`.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        let nodes = env_var("REDCSYNC_CLUSTER_NODES").context("REDCSYNC_CLUSTER_NODES is not set")?;
        let mut cfg = Self::new(
            nodes
                .split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty()),
        );
        if let Some(v) = env_var("REDCSYNC_CONNECT_TIMEOUT_MS") {
            cfg.connect_timeout_ms = v.parse().context("REDCSYNC_CONNECT_TIMEOUT_MS")?;
        }
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}
