//! Tests for the blocking adapter

use std::time::Duration;

use redcsync::{AcquireOptions, BlockingMutex, CancelHandle, InMemoryStore, LockError, Redcsync};

fn blocking(store: &InMemoryStore, name: &str) -> BlockingMutex<InMemoryStore> {
    let mutex = Redcsync::new(store.clone())
        .new_mutex(name)
        .with_tries(2)
        .with_delay(|_attempt: u32| Duration::from_millis(5))
        .build()
        .unwrap();
    BlockingMutex::new(mutex).unwrap()
}

#[test]
fn test_blocking_lock_extend_unlock() {
    let store = InMemoryStore::new();
    let mutex = blocking(&store, "blocking:1");
    assert_eq!(mutex.inner().name(), "blocking:1");

    let lease = mutex.lock().unwrap();
    assert_eq!(store.get("blocking:1").as_deref(), Some(lease.token()));
    assert!(mutex.extend(&lease).unwrap());
    assert!(mutex.unlock(&lease).unwrap());
    assert!(!mutex.unlock(&lease).unwrap());
}

#[test]
fn test_blocking_contention_across_threads() {
    let store = InMemoryStore::new();
    let holder = blocking(&store, "blocking:2");
    let lease = holder.lock().unwrap();

    let other = store.clone();
    let result = std::thread::spawn(move || blocking(&other, "blocking:2").lock())
        .join()
        .unwrap();
    assert!(matches!(result, Err(LockError::AcquisitionTimeout { tries: 2, .. })));
    assert!(holder.unlock(&lease).unwrap());
}

#[test]
fn test_blocking_lock_with_cancel() {
    let store = InMemoryStore::new();
    let mutex = blocking(&store, "blocking:3");
    let cancel = CancelHandle::new();
    cancel.cancel();
    let err = mutex
        .lock_with(&AcquireOptions::new().with_cancel(cancel))
        .unwrap_err();
    assert!(matches!(err, LockError::Cancelled));
}
