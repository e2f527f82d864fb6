//! Time-based promise sources.
//!
//! Pausing is decoupled from whatever operation is being waited on: a delay is
//! just another promise, so the combinator layer can race timers against work
//! uniformly. Sleepers run on a shared thread pool and settle their cell when
//! the due time passes.

use std::{
    sync::OnceLock,
    thread,
    time::{Duration, Instant},
};

use futures::executor::{ThreadPool, ThreadPoolBuilder};

use crate::promise::Promise;

static THREAD_POOL: OnceLock<ThreadPool> = OnceLock::new();

// Shared pool for delay sleepers and default progress delivery. Each in-flight
// delay occupies one pool thread until its due time.
pub(crate) fn shared_pool() -> &'static ThreadPool {
    THREAD_POOL.get_or_init(|| {
        ThreadPoolBuilder::new()
            .pool_size(100)
            .create()
            .expect("Thread pool creation failed")
    })
}

/// Returns a promise that resolves after `duration`, measured from this call.
///
/// A delay never fails on its own. It may be cancelled through the returned
/// handle, which is how timeout races drop their timer without leaking a
/// pending cell: the sleeper still runs to its due time, finds the cell
/// settled, and discards its resolution.
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use asyncell::timer;
///
/// # async {
/// timer::delay(Duration::from_millis(50)).wait().await.unwrap();
/// // At least 50ms have passed.
/// # };
/// ```
pub fn delay(duration: Duration) -> Promise<()> {
    delay_value((), duration)
}

/// Returns a promise that resolves with `value` after `duration`.
///
/// Handy for faking an asynchronous operation: tests that exercise waiting,
/// racing, or completion ordering can produce a known value at a known time
/// without any real work behind it.
pub fn delay_value<T>(value: T, duration: Duration) -> Promise<T>
where
    T: Clone + Send + 'static,
{
    let promise = Promise::new();
    let cell = promise.clone();
    let due = Instant::now() + duration;
    shared_pool().spawn_ok(async move {
        let remaining = due.saturating_duration_since(Instant::now());
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
        let _ = cell.resolve(value);
    });
    promise
}
