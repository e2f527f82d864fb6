use std::time::{Duration, Instant};

use asyncell::{Promise, TaskError, timer};

#[derive(Debug)]
struct Boom(&'static str);

impl std::fmt::Display for Boom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "boom: {}", self.0)
    }
}

impl std::error::Error for Boom {}

#[tokio::test(flavor = "multi_thread")]
async fn resolve_releases_every_waiter() {
    let promise = Promise::new();

    let first = tokio::spawn({
        let handle = promise.clone();
        async move { handle.wait().await }
    });
    let second = tokio::spawn({
        let handle = promise.clone();
        async move { handle.await }
    });

    // Let both waiters suspend before the producer settles the cell.
    tokio::time::sleep(Duration::from_millis(20)).await;
    promise.resolve(7).unwrap();

    assert_eq!(
        first.await.unwrap().unwrap(),
        7,
        "First waiter should observe the resolved value"
    );
    assert_eq!(
        second.await.unwrap().unwrap(),
        7,
        "Second waiter should observe the same value"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn second_transition_fails_and_keeps_the_outcome() {
    let promise = Promise::new();
    promise.resolve(1).unwrap();

    assert!(
        matches!(promise.resolve(2), Err(TaskError::AlreadyResolved)),
        "Second resolve should report the cell is settled"
    );
    assert!(
        matches!(promise.reject(Boom("late")), Err(TaskError::AlreadyResolved)),
        "Reject after resolve should report the cell is settled"
    );
    assert!(
        matches!(promise.cancel(), Err(TaskError::AlreadyResolved)),
        "Cancel after resolve should report the cell is settled"
    );
    assert_eq!(
        promise.wait().await.unwrap(),
        1,
        "Stored outcome should be the first resolution"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn waiting_twice_reads_the_same_outcome() {
    let promise = Promise::resolved("value");

    assert_eq!(promise.wait().await.unwrap(), "value");
    assert_eq!(
        promise.wait().await.unwrap(),
        "value",
        "Reading a settled cell should be idempotent"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn rejection_shows_the_same_cause_to_every_waiter() {
    let promise: Promise<u32> = Promise::new();
    promise.reject(Boom("shared")).unwrap();

    for _ in 0..2 {
        match promise.wait().await {
            Err(TaskError::Failed(cause)) => {
                assert_eq!(cause.to_string(), "boom: shared");
            }
            other => panic!("Expected the captured failure, got {other:?}"),
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn cancellation_is_observed_as_cancelled() {
    let promise: Promise<u32> = Promise::new();
    promise.cancel().unwrap();

    assert!(
        matches!(promise.wait().await, Err(TaskError::Cancelled)),
        "Waiters on a cancelled promise should see cancellation"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn settled_constructors_complete_immediately() {
    assert_eq!(Promise::resolved(3).wait().await.unwrap(), 3);
    assert!(matches!(
        Promise::<u32>::rejected(Boom("stub")).wait().await,
        Err(TaskError::Failed(_))
    ));
    assert!(matches!(
        Promise::<u32>::cancelled().wait().await,
        Err(TaskError::Cancelled)
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn delay_resolves_after_the_duration() {
    let started = Instant::now();
    timer::delay(Duration::from_millis(50)).wait().await.unwrap();

    assert!(
        started.elapsed() >= Duration::from_millis(50),
        "Delay should not resolve before its due time"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn delay_value_carries_its_value() {
    let value = timer::delay_value("late", Duration::from_millis(10))
        .wait()
        .await
        .unwrap();
    assert_eq!(value, "late");
}

#[test]
fn waiting_needs_no_particular_runtime() {
    let value = futures_lite::future::block_on(async {
        timer::delay_value(9, Duration::from_millis(20))
            .wait()
            .await
            .unwrap()
    });
    assert_eq!(value, 9, "A plain block_on is enough to drive a wait");
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelled_delay_stays_cancelled_past_its_due_time() {
    let pause = timer::delay(Duration::from_millis(20));
    pause.cancel().unwrap();

    // Give the sleeper time to fire and find the cell settled.
    tokio::time::sleep(Duration::from_millis(60)).await;

    assert!(
        matches!(pause.wait().await, Err(TaskError::Cancelled)),
        "The sleeper's late resolution must not overwrite the cancellation"
    );
}
