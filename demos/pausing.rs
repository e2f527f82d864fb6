//! Pausing for a period of time.
//!
//! A delay is just a promise that resolves when the due time passes, so it can
//! be awaited, raced, and combined like any other operation. `delay_value` is
//! the same thing carrying a payload, which makes it a convenient fake for an
//! asynchronous operation with a known result and a known latency.

use std::time::{Duration, Instant};

use asyncell::timer;

#[tokio::main]
async fn main() {
    let started = Instant::now();

    println!("Pausing for half a second...");
    timer::delay(Duration::from_millis(500)).wait().await.unwrap();
    println!("Resumed after {:?}", started.elapsed());

    let quote = timer::delay_value(128.25, Duration::from_millis(200));
    println!("Fake quote service answered: {}", quote.wait().await.unwrap());

    // A cancelled delay settles immediately for its waiters; the sleeper
    // behind it simply finds the cell settled when it fires.
    let abandoned = timer::delay(Duration::from_secs(5));
    abandoned.cancel().unwrap();
    println!("Cancelled delay observed as: {:?}", abandoned.wait().await);
}
