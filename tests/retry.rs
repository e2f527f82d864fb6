use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
    time::{Duration, Instant},
};

use asyncell::{
    Promise, TaskError,
    retry::{RetryPolicy, retry},
};

#[derive(Debug)]
struct Flaky(u32);

impl std::fmt::Display for Flaky {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed on attempt {}", self.0)
    }
}

impl std::error::Error for Flaky {}

#[tokio::test(flavor = "multi_thread")]
async fn a_first_attempt_success_needs_no_retries() {
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&attempts);

    let policy = RetryPolicy::exponential(Duration::from_millis(10), 3);
    let value = retry(policy, || {
        counter.fetch_add(1, Ordering::SeqCst);
        Promise::resolved(42)
    })
    .await
    .unwrap();

    assert_eq!(value, 42);
    assert_eq!(
        attempts.load(Ordering::SeqCst),
        1,
        "A success should stop the runner immediately"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn early_failures_are_swallowed_until_a_success() {
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&attempts);

    let policy = RetryPolicy::exponential(Duration::from_millis(5), 3);
    let value = retry(policy, || {
        let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt < 3 {
            Promise::rejected(Flaky(attempt))
        } else {
            Promise::resolved("made it")
        }
    })
    .await
    .unwrap();

    assert_eq!(value, "made it");
    assert_eq!(
        attempts.load(Ordering::SeqCst),
        3,
        "Two quiet failures, then the successful attempt"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn exhaustion_runs_the_exact_attempt_count_and_propagates_the_last_error() {
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&attempts);

    let policy = RetryPolicy::exponential(Duration::from_millis(5), 3);
    assert_eq!(policy.attempts(), 4);

    let outcome: Result<u32, TaskError> = retry(policy, || {
        let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
        Promise::rejected(Flaky(attempt))
    })
    .await;

    assert_eq!(
        attempts.load(Ordering::SeqCst),
        4,
        "Three quiet attempts plus the final loud one"
    );
    match outcome {
        Err(TaskError::Failed(cause)) => {
            assert_eq!(
                cause.to_string(),
                "failed on attempt 4",
                "The final attempt's error should propagate verbatim"
            );
        }
        other => panic!("Expected the final failure, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn pauses_between_attempts_double() {
    let stamps = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&stamps);

    let policy = RetryPolicy::exponential(Duration::from_millis(30), 3);
    let _ = retry(policy, || {
        recorder.lock().unwrap().push(Instant::now());
        Promise::<u32>::rejected(Flaky(0))
    })
    .await;

    let stamps = stamps.lock().unwrap();
    assert_eq!(stamps.len(), 4);
    let gaps: Vec<Duration> = stamps.windows(2).map(|w| w[1] - w[0]).collect();

    assert!(
        gaps[0] >= Duration::from_millis(30),
        "First pause should be at least the configured delay, was {:?}",
        gaps[0]
    );
    assert!(
        gaps[1] >= Duration::from_millis(60),
        "Second pause should be at least twice the delay, was {:?}",
        gaps[1]
    );
    assert!(
        gaps[2] >= Duration::from_millis(120),
        "Third pause should be at least four times the delay, was {:?}",
        gaps[2]
    );
}
