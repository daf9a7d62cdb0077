//! Mutex configuration.

use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::config::env_var;
use crate::core::store::check_ttl;
use crate::core::AppResult;

/// Settings applied to every mutex built from a factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutexConfig {
    /// Lease TTL in milliseconds.
    pub expiry_ms: u64,
    /// Maximum acquisition attempts per `lock` call.
    pub tries: u32,
    /// Constant wait between attempts in milliseconds.
    pub retry_delay_ms: u64,
    /// Reserved drift factor. Carried but not read by the protocol.
    pub factor: Option<f64>,
    /// Reserved quorum size. Carried but not read by the protocol.
    pub quorum: Option<u32>,
}

impl Default for MutexConfig {
    fn default() -> Self {
        Self {
            expiry_ms: 8_000,
            tries: 32,
            retry_delay_ms: 150,
            factor: None,
            quorum: None,
        }
    }
}

impl MutexConfig {
    /// Lease TTL.
    #[must_use]
    pub const fn expiry(&self) -> Duration {
        Duration::from_millis(self.expiry_ms)
    }

    /// Wait between attempts.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        check_ttl(self.expiry())?;
        if self.tries == 0 {
            return Err("tries must be at least 1".into());
        }
        Ok(())
    }

    /// Parse mutex configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read `REDCSYNC_EXPIRY_MS`, `REDCSYNC_TRIES` and `REDCSYNC_RETRY_DELAY_MS`
    /// (after loading `.env`), falling back to defaults for unset variables.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        let mut cfg = Self::default();
        if let Some(v) = env_var("REDCSYNC_EXPIRY_MS") {
            cfg.expiry_ms = v.parse().context("REDCSYNC_EXPIRY_MS")?;
        }
        if let Some(v) = env_var("REDCSYNC_TRIES") {
            cfg.tries = v.parse().context("REDCSYNC_TRIES")?;
        }
        if let Some(v) = env_var("REDCSYNC_RETRY_DELAY_MS") {
            cfg.retry_delay_ms = v.parse().context("REDCSYNC_RETRY_DELAY_MS")?;
        }
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}
