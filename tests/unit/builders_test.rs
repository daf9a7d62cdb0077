//! Tests for builder modules

use std::time::Duration;

use redcsync::core::{MAX_TTL, MIN_TTL};
use redcsync::{ConstantDelay, InMemoryStore, LockError, MutexConfig, Redcsync};

#[test]
fn test_mutex_builder_defaults() {
    let rs = Redcsync::new(InMemoryStore::new());
    let builder = rs.new_mutex("res:1");
    assert_eq!(builder.name(), "res:1");

    let mutex = builder.build().unwrap();
    assert_eq!(mutex.name(), "res:1");
    assert_eq!(mutex.expiry(), Duration::from_secs(8));
    assert_eq!(mutex.tries(), 32);
    assert_eq!(mutex.max_wait(), Duration::from_millis(150 * 31));
    assert!(mutex.factor().is_none());
    assert!(mutex.quorum().is_none());
}

#[test]
fn test_mutex_builder_overrides() {
    let mutex = Redcsync::new(InMemoryStore::new())
        .new_mutex("res:2")
        .with_expiry(Duration::from_secs(2))
        .with_tries(4)
        .with_delay(ConstantDelay(Duration::from_millis(25)))
        .build()
        .unwrap();
    assert_eq!(mutex.expiry(), Duration::from_secs(2));
    assert_eq!(mutex.tries(), 4);
    assert_eq!(mutex.max_wait(), Duration::from_millis(75));
}

#[test]
fn test_factory_defaults_apply_to_every_mutex() {
    let defaults = MutexConfig {
        expiry_ms: 1_000,
        tries: 2,
        retry_delay_ms: 10,
        factor: Some(0.01),
        quorum: Some(2),
    };
    let rs = Redcsync::new(InMemoryStore::new()).with_defaults(defaults);
    for name in ["a", "b"] {
        let mutex = rs.new_mutex(name).build().unwrap();
        assert_eq!(mutex.expiry(), Duration::from_secs(1));
        assert_eq!(mutex.tries(), 2);
        assert_eq!(mutex.max_wait(), Duration::from_millis(10));
        assert_eq!(mutex.factor(), Some(0.01));
        assert_eq!(mutex.quorum(), Some(2));
    }
}

#[test]
fn test_with_config_replaces_settings() {
    let cfg = MutexConfig {
        tries: 3,
        ..MutexConfig::default()
    };
    let mutex = Redcsync::new(InMemoryStore::new())
        .new_mutex("res:3")
        .with_tries(99)
        .with_config(&cfg)
        .build()
        .unwrap();
    assert_eq!(mutex.tries(), 3);
}

#[test]
fn test_mutex_builder_rejects_invalid_settings() {
    let rs = Redcsync::new(InMemoryStore::new());
    assert!(matches!(rs.new_mutex("").build(), Err(LockError::InvalidConfig(_))));
    assert!(matches!(
        rs.new_mutex("res:4").with_tries(0).build(),
        Err(LockError::InvalidConfig(_))
    ));
    assert!(matches!(
        rs.new_mutex("res:4").with_expiry(Duration::ZERO).build(),
        Err(LockError::InvalidConfig(_))
    ));
}

#[test]
fn test_mutex_builder_expiry_bounds() {
    let rs = Redcsync::new(InMemoryStore::new());
    // Sub-millisecond expiries would reach the store as `PX 0`.
    assert!(matches!(
        rs.new_mutex("res:5").with_expiry(Duration::from_micros(900)).build(),
        Err(LockError::InvalidConfig(_))
    ));
    assert!(matches!(
        rs.new_mutex("res:5").with_expiry(Duration::MAX).build(),
        Err(LockError::InvalidConfig(_))
    ));
    assert!(matches!(
        rs.new_mutex("res:5").with_expiry(MAX_TTL + Duration::from_millis(1)).build(),
        Err(LockError::InvalidConfig(_))
    ));
    assert!(rs.new_mutex("res:5").with_expiry(MIN_TTL).build().is_ok());
    assert!(rs.new_mutex("res:5").with_expiry(MAX_TTL).build().is_ok());
}

#[test]
fn test_factory_clones_share_client() {
    let rs = Redcsync::new(InMemoryStore::new());
    let copy = rs.clone();
    assert!(std::sync::Arc::ptr_eq(rs.client(), copy.client()));
}
