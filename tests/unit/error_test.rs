//! Tests for error types

use std::error::Error as _;

use redcsync::{LockError, StoreError};

#[test]
fn test_acquisition_timeout_error() {
    let err = LockError::AcquisitionTimeout {
        name: "res:1".to_string(),
        tries: 3,
    };
    assert_eq!(
        format!("{}", err),
        "acquire lock timeout: `res:1` not acquired after 3 attempt(s)"
    );
    assert!(err.is_timeout());
}

#[test]
fn test_token_generation_error() {
    let err = LockError::TokenGeneration("entropy unavailable".to_string());
    assert_eq!(format!("{}", err), "failed to generate lock token: entropy unavailable");
    assert!(!err.is_timeout());
}

#[test]
fn test_transport_error_keeps_source() {
    let err = LockError::Transport {
        op: "unlock",
        key: "res:1".to_string(),
        source: StoreError::Unreachable("connection refused".to_string()),
    };
    assert_eq!(format!("{}", err), "unlock `res:1`: store unreachable: connection refused");
    let source = err.source().expect("store error attached");
    assert_eq!(source.to_string(), "store unreachable: connection refused");
}

#[test]
fn test_store_errors() {
    assert_eq!(
        format!("{}", StoreError::Routing("MOVED 3999".to_string())),
        "routing error: MOVED 3999"
    );
    assert_eq!(
        format!("{}", StoreError::Protocol("nil".to_string())),
        "unexpected reply: nil"
    );
    assert_eq!(
        format!("{}", StoreError::Backend("oom".to_string())),
        "backend error: oom"
    );
}

#[test]
fn test_caller_bound_errors() {
    assert_eq!(format!("{}", LockError::Cancelled), "lock acquisition cancelled");
    assert_eq!(format!("{}", LockError::DeadlineExceeded), "lock acquisition deadline exceeded");
    assert_eq!(
        format!("{}", LockError::InvalidConfig("tries must be at least 1".to_string())),
        "invalid configuration: tries must be at least 1"
    );
}
