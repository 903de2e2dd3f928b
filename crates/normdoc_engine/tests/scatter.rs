use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use normdoc_engine::{fan_out_join, with_retry, FailureKind, FetchError, RetryPolicy};

fn transient_error() -> FetchError {
    FetchError {
        kind: FailureKind::Timeout,
        message: "timed out".to_string(),
    }
}

fn permanent_error() -> FetchError {
    FetchError {
        kind: FailureKind::HttpStatus(404),
        message: "not found".to_string(),
    }
}

#[tokio::test]
async fn nine_units_dispatch_and_join_once() {
    let cancel = CancellationToken::new();
    let joined = Arc::new(AtomicUsize::new(0));

    // Two page results of sizes 5 and 4 flatten into nine card units.
    let cards: Vec<u64> = vec![vec![1, 2, 3, 4, 5], vec![6, 7, 8, 9]]
        .into_iter()
        .flatten()
        .collect();

    let outcome = fan_out_join(&cancel, cards, |n| async move {
        Ok::<u64, FetchError>(n * 10)
    })
    .await;
    joined.fetch_add(1, Ordering::SeqCst);

    assert_eq!(outcome.dispatched, 9);
    assert_eq!(outcome.completed.len(), 9);
    assert_eq!(outcome.failed, 0);
    assert_eq!(outcome.skipped, 0);
    assert_eq!(joined.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_units_are_dropped_from_the_join() {
    let cancel = CancellationToken::new();

    let outcome = fan_out_join(&cancel, 1..=5u64, |n| async move {
        if n % 2 == 0 {
            Err(permanent_error())
        } else {
            Ok(n)
        }
    })
    .await;

    assert_eq!(outcome.dispatched, 5);
    let mut completed = outcome.completed.clone();
    completed.sort_unstable();
    assert_eq!(completed, vec![1, 3, 5]);
    assert_eq!(outcome.failed, 2);
}

#[tokio::test]
async fn cancelled_token_skips_every_unit_but_still_joins() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let started = Arc::new(AtomicUsize::new(0));

    let outcome = fan_out_join(&cancel, 1..=4u64, |n| {
        let started = started.clone();
        async move {
            started.fetch_add(1, Ordering::SeqCst);
            Ok::<u64, FetchError>(n)
        }
    })
    .await;

    assert_eq!(outcome.dispatched, 4);
    assert_eq!(outcome.skipped, 4);
    assert!(outcome.completed.is_empty());
    assert_eq!(started.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn retry_recovers_from_transient_failures() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let policy = RetryPolicy {
        max_attempts: 5,
        interval: Duration::from_millis(1),
    };

    let attempts_in = attempts.clone();
    let result = with_retry(policy, "test op", move || {
        let attempts = attempts_in.clone();
        async move {
            if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(transient_error())
            } else {
                Ok(42u32)
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), 42);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retry_does_not_repeat_permanent_failures() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let policy = RetryPolicy {
        max_attempts: 5,
        interval: Duration::from_millis(1),
    };

    let attempts_in = attempts.clone();
    let result: Result<u32, FetchError> = with_retry(policy, "test op", move || {
        let attempts = attempts_in.clone();
        async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(permanent_error())
        }
    })
    .await;

    assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(404));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn retry_exhaustion_surfaces_the_last_error() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let policy = RetryPolicy {
        max_attempts: 3,
        interval: Duration::from_millis(1),
    };

    let attempts_in = attempts.clone();
    let result: Result<u32, FetchError> = with_retry(policy, "test op", move || {
        let attempts = attempts_in.clone();
        async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(transient_error())
        }
    })
    .await;

    assert_eq!(result.unwrap_err().kind, FailureKind::Timeout);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}
