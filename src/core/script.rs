//! Atomic compare-and-act scripts.
//!
//! Both scripts read the value stored under `KEYS[1]` and mutate the key only
//! when it equals the caller's token, inside one store-side execution. A plain
//! `GET` followed by `DEL`/`PEXPIRE` would leave a window in which the lease
//! expires and another holder acquires it between the two commands.
//!
//! The scripts are process-wide constants. Adapters that prepare them (for
//! example by hashing the source for `EVALSHA`) do so once and share the
//! result.

/// The conditional mutation a script performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    /// Delete the key if its value equals `ARGV[1]`.
    CompareAndDelete,
    /// Set the key's TTL to `ARGV[2]` milliseconds if its value equals `ARGV[1]`.
    CompareAndExpire,
}

/// A fixed script executed atomically against a single key.
#[derive(Debug, PartialEq, Eq)]
pub struct AtomicScript {
    /// What the script does.
    pub kind: ScriptKind,
    /// Lua source for stores with server-side scripting.
    pub source: &'static str,
}

impl AtomicScript {
    /// Number of keys the script touches.
    pub const KEY_COUNT: usize = 1;

    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self.kind {
            ScriptKind::CompareAndDelete => "release",
            ScriptKind::CompareAndExpire => "renew",
        }
    }
}

/// `RELEASE(key, token)`: returns `1` if the key was deleted, `0` otherwise.
pub static RELEASE_SCRIPT: AtomicScript = AtomicScript {
    kind: ScriptKind::CompareAndDelete,
    source: r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#,
};

/// `RENEW(key, token, ttl_ms)`: returns `1` if the TTL was reset, `0` otherwise.
pub static RENEW_SCRIPT: AtomicScript = AtomicScript {
    kind: ScriptKind::CompareAndExpire,
    source: r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("PEXPIRE", KEYS[1], ARGV[2])
else
    return 0
end
"#,
};
