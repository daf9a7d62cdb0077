//! In-memory store backend.
//!
//! A single-process lock authority for development and tests. Every command
//! and script runs under one lock, which gives scripts the same atomicity a
//! real store provides. Expiry uses the tokio clock, so tests running with
//! paused time can advance past a TTL without sleeping.
//!
//! Expired keys are dropped when read, and swept in bulk on insert once the
//! table has doubled since the last sweep, so a process cycling through many
//! lock names does not accumulate dead entries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::core::cancel::deadline_after;
use crate::core::{AtomicScript, ScriptKind, StoreClient, StoreConnection, StoreError};

// Table size below which inserts never sweep.
const SWEEP_FLOOR: usize = 64;

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct Shared {
    entries: Mutex<HashMap<String, Entry>>,
    open: AtomicUsize,
    unreachable: AtomicBool,
    fail_next: AtomicUsize,
    fail_commands: AtomicUsize,
    sweep_at: AtomicUsize,
}

impl Shared {
    /// Look up a live entry, dropping it first if its TTL has elapsed.
    fn live<'a>(entries: &'a mut HashMap<String, Entry>, key: &str) -> Option<&'a mut Entry> {
        let now = Instant::now();
        if entries.get(key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(key);
        }
        entries.get_mut(key)
    }

    /// Drop every expired entry once the table has doubled since the last sweep.
    fn sweep(&self, entries: &mut HashMap<String, Entry>) {
        if entries.len() < self.sweep_at.load(Ordering::Relaxed).max(SWEEP_FLOOR) {
            return;
        }
        let now = Instant::now();
        entries.retain(|_, e| e.expires_at > now);
        self.sweep_at.store(entries.len() * 2, Ordering::Relaxed);
    }

    fn fail_command(&self, key: &str) -> Result<(), StoreError> {
        if self
            .fail_commands
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::Backend(format!("command on `{key}` failed")));
        }
        Ok(())
    }

    fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError> {
        self.fail_command(key)?;
        let mut entries = self.entries.lock();
        if Self::live(&mut entries, key).is_some() {
            return Ok(false);
        }
        self.sweep(&mut entries);
        entries.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at: deadline_after(Instant::now(), ttl),
            },
        );
        Ok(true)
    }

    fn eval(&self, script: &AtomicScript, key: &str, args: &[String]) -> Result<i64, StoreError> {
        self.fail_command(key)?;
        let token = args
            .first()
            .ok_or_else(|| StoreError::Protocol(format!("{}: missing token", script.name())))?;
        let mut entries = self.entries.lock();
        let Some(entry) = Self::live(&mut entries, key) else {
            return Ok(0);
        };
        if entry.value != *token {
            return Ok(0);
        }
        match script.kind {
            ScriptKind::CompareAndDelete => {
                entries.remove(key);
            }
            ScriptKind::CompareAndExpire => {
                let ttl_ms: u64 = args
                    .get(1)
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(|| {
                        StoreError::Protocol(format!("{}: invalid ttl", script.name()))
                    })?;
                entry.expires_at = deadline_after(Instant::now(), Duration::from_millis(ttl_ms));
            }
        }
        Ok(1)
    }
}

/// Shared in-memory store. Clones see the same keys.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    shared: Arc<Shared>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `key`, if it exists and has not expired.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.shared.entries.lock();
        Shared::live(&mut entries, key).map(|e| e.value.clone())
    }

    /// Remaining TTL of `key`, if it exists and has not expired.
    #[must_use]
    pub fn pttl(&self, key: &str) -> Option<Duration> {
        let mut entries = self.shared.entries.lock();
        Shared::live(&mut entries, key)
            .map(|e| e.expires_at.saturating_duration_since(Instant::now()))
    }

    /// Number of live keys.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.shared.entries.lock();
        entries.retain(|_, e| e.expires_at > now);
        entries.len()
    }

    /// Whether no live key exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Connections currently borrowed and not yet dropped.
    #[must_use]
    pub fn open_connections(&self) -> usize {
        self.shared.open.load(Ordering::SeqCst)
    }

    /// Refuse every connection while `unreachable` is set.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.shared.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Refuse the next `n` connections.
    pub fn fail_next_connections(&self, n: usize) {
        self.shared.fail_next.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` commands (`set_if_absent` or `eval`) on open connections.
    pub fn fail_next_commands(&self, n: usize) {
        self.shared.fail_commands.store(n, Ordering::SeqCst);
    }

    fn injected_failure(&self) -> bool {
        if self.shared.unreachable.load(Ordering::SeqCst) {
            return true;
        }
        self.shared
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl StoreClient for InMemoryStore {
    type Connection = InMemoryConnection;

    async fn connection(&self, key: &str) -> Result<Self::Connection, StoreError> {
        if self.injected_failure() {
            return Err(StoreError::Unreachable(format!("node for `{key}` refused connection")));
        }
        self.shared.open.fetch_add(1, Ordering::SeqCst);
        Ok(InMemoryConnection {
            shared: Arc::clone(&self.shared),
        })
    }
}

/// Connection handed out by [`InMemoryStore`]. Released on drop.
#[derive(Debug)]
pub struct InMemoryConnection {
    shared: Arc<Shared>,
}

impl Drop for InMemoryConnection {
    fn drop(&mut self) {
        self.shared.open.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StoreConnection for InMemoryConnection {
    async fn set_if_absent(
        &mut self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        self.shared.set_if_absent(key, value, ttl)
    }

    async fn eval(
        &mut self,
        script: &AtomicScript,
        key: &str,
        args: &[String],
    ) -> Result<i64, StoreError> {
        self.shared.eval(script, key, args)
    }
}
