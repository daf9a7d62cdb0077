//! Tests for configuration validation

use std::time::Duration;

use redcsync::{ClusterConfig, MutexConfig};

#[test]
fn test_mutex_config_defaults() {
    let cfg = MutexConfig::default();
    assert_eq!(cfg.expiry(), Duration::from_secs(8));
    assert_eq!(cfg.tries, 32);
    assert_eq!(cfg.retry_delay(), Duration::from_millis(150));
    assert!(cfg.factor.is_none());
    assert!(cfg.quorum.is_none());
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_mutex_config_invalid_expiry() {
    let invalid = MutexConfig {
        expiry_ms: 0,
        ..MutexConfig::default()
    };
    assert!(invalid.validate().is_err());

    let too_long = MutexConfig {
        expiry_ms: u64::MAX,
        ..MutexConfig::default()
    };
    assert!(too_long.validate().is_err());
    assert!(MutexConfig::from_json_str(r#"{"expiry_ms": 18446744073709551615}"#).is_err());
}

#[test]
fn test_mutex_config_invalid_tries() {
    let invalid = MutexConfig {
        tries: 0,
        ..MutexConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_mutex_config_from_json() {
    let cfg = MutexConfig::from_json_str(r#"{"expiry_ms": 2000, "tries": 5}"#).unwrap();
    assert_eq!(cfg.expiry(), Duration::from_secs(2));
    assert_eq!(cfg.tries, 5);
    assert_eq!(cfg.retry_delay_ms, 150);

    let reserved = MutexConfig::from_json_str(r#"{"factor": 0.01, "quorum": 2}"#).unwrap();
    assert_eq!(reserved.factor, Some(0.01));
    assert_eq!(reserved.quorum, Some(2));

    assert!(MutexConfig::from_json_str(r#"{"tries": 0}"#).is_err());
    assert!(MutexConfig::from_json_str("not json").is_err());
}

#[test]
fn test_mutex_config_from_env() {
    std::env::set_var("REDCSYNC_EXPIRY_MS", "3000");
    std::env::set_var("REDCSYNC_TRIES", "7");
    std::env::remove_var("REDCSYNC_RETRY_DELAY_MS");
    let cfg = MutexConfig::from_env().unwrap();
    assert_eq!(cfg.expiry_ms, 3_000);
    assert_eq!(cfg.tries, 7);
    assert_eq!(cfg.retry_delay_ms, 150);

    std::env::set_var("REDCSYNC_TRIES", "many");
    assert!(MutexConfig::from_env().is_err());
    std::env::remove_var("REDCSYNC_EXPIRY_MS");
    std::env::remove_var("REDCSYNC_TRIES");
}

#[test]
fn test_cluster_config_validation() {
    let valid = ClusterConfig::new(["redis://127.0.0.1:7000", "redis://127.0.0.1:7001"]);
    assert!(valid.validate().is_ok());
    assert_eq!(valid.connect_timeout(), Duration::from_secs(5));

    let empty = ClusterConfig::new(Vec::<String>::new());
    assert!(empty.validate().is_err());

    let blank = ClusterConfig::new(["redis://127.0.0.1:7000", "  "]);
    assert!(blank.validate().is_err());

    let no_timeout = ClusterConfig {
        connect_timeout_ms: 0,
        ..valid
    };
    assert!(no_timeout.validate().is_err());
}

#[test]
fn test_cluster_config_from_json() {
    let cfg = ClusterConfig::from_json_str(r#"{"nodes": ["redis://10.0.0.1:7000"]}"#).unwrap();
    assert_eq!(cfg.nodes, vec!["redis://10.0.0.1:7000".to_string()]);
    assert_eq!(cfg.connect_timeout_ms, 5_000);

    assert!(ClusterConfig::from_json_str(r#"{"nodes": []}"#).is_err());
}

#[test]
fn test_cluster_config_from_env() {
    std::env::set_var(
        "REDCSYNC_CLUSTER_NODES",
        "redis://10.0.0.1:7000, redis://10.0.0.2:7000,",
    );
    std::env::set_var("REDCSYNC_CONNECT_TIMEOUT_MS", "250");
    let cfg = ClusterConfig::from_env().unwrap();
    assert_eq!(
        cfg.nodes,
        vec!["redis://10.0.0.1:7000".to_string(), "redis://10.0.0.2:7000".to_string()]
    );
    assert_eq!(cfg.connect_timeout(), Duration::from_millis(250));

    std::env::remove_var("REDCSYNC_CLUSTER_NODES");
    assert!(ClusterConfig::from_env().is_err());
    std::env::remove_var("REDCSYNC_CONNECT_TIMEOUT_MS");
}
