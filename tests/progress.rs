use std::{
    pin::Pin,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use asyncell::progress::{self, DeliveryContext, Progress};

#[tokio::test(flavor = "multi_thread")]
async fn reports_arrive_in_emission_order() {
    let (reporter, channel) = progress::channel();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let drained = channel.subscribe(move |value: u32| sink.lock().unwrap().push(value));

    for value in 0..10 {
        reporter.report(value);
    }
    drop(reporter);
    drained.wait().await.unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        (0..10).collect::<Vec<u32>>(),
        "Delivery order should match emission order"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn completion_signal_fires_only_after_the_queue_drains() {
    let (reporter, channel) = progress::channel();
    let delivered = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&delivered);

    let drained = channel.subscribe(move |_: u32| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    for value in 0..5 {
        reporter.report(value);
    }
    drop(reporter);
    drained.wait().await.unwrap();

    assert_eq!(
        delivered.load(Ordering::SeqCst),
        5,
        "Every queued report should be delivered before completion"
    );
}

struct CountingContext {
    spawned: AtomicUsize,
}

impl DeliveryContext for CountingContext {
    fn spawn(&self, work: Pin<Box<dyn Future<Output = ()> + Send + 'static>>) {
        self.spawned.fetch_add(1, Ordering::SeqCst);
        tokio::spawn(work);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn delivery_runs_on_the_supplied_context() {
    let context = Arc::new(CountingContext {
        spawned: AtomicUsize::new(0),
    });
    let shared: Arc<dyn DeliveryContext> = context.clone();
    let (reporter, channel) = progress::channel_in(shared);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let drained = channel.subscribe(move |value: &'static str| sink.lock().unwrap().push(value));

    reporter.report("step one");
    reporter.report("step two");
    drop(reporter);
    drained.wait().await.unwrap();

    assert_eq!(
        context.spawned.load(Ordering::SeqCst),
        1,
        "The channel should schedule exactly one delivery pump on the context"
    );
    assert_eq!(*seen.lock().unwrap(), vec!["step one", "step two"]);
}

// An operation that reports progress if it was given somewhere to report to.
async fn count_up(total: u32, progress: Option<&Progress<u32>>) -> u32 {
    let mut complete = 0;
    while complete < total {
        tokio::time::sleep(Duration::from_millis(1)).await;
        complete += 1;
        if let Some(progress) = progress {
            progress.report(complete);
        }
    }
    complete
}

#[tokio::test(flavor = "multi_thread")]
async fn absent_progress_is_a_complete_noop() {
    assert_eq!(
        count_up(4, None).await,
        4,
        "An operation without a progress sink should run unchanged"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn present_progress_sees_every_step() {
    let (reporter, channel) = progress::channel();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let drained = channel.subscribe(move |value: u32| sink.lock().unwrap().push(value));

    count_up(4, Some(&reporter)).await;
    drop(reporter);
    drained.wait().await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
}
