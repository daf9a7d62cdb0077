//! Tests for backoff policies

use std::time::Duration;

use redcsync::core::{max_wait, DEFAULT_RETRY_DELAY};
use redcsync::{ConstantDelay, DelayStrategy};

#[test]
fn test_constant_delay_default() {
    assert_eq!(ConstantDelay::default(), ConstantDelay(DEFAULT_RETRY_DELAY));
    assert_eq!(ConstantDelay::default().next(5), Duration::from_millis(150));
}

#[test]
fn test_max_wait_for_constant_delay() {
    let delay = ConstantDelay(Duration::from_millis(100));
    assert_eq!(max_wait(&delay, 5), Duration::from_millis(400));
}

#[test]
fn test_exponential_closure() {
    let exponential = |attempt: u32| Duration::from_millis(10 * 2u64.pow(attempt - 1));
    assert_eq!(exponential.next(1), Duration::from_millis(10));
    assert_eq!(exponential.next(3), Duration::from_millis(40));
    assert_eq!(max_wait(&exponential, 4), Duration::from_millis(70));
}
