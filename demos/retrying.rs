//! Retrying with exponential backoff, and giving up with a timeout.
//!
//! The runner swallows early failures with doubling pauses between attempts,
//! then lets the final attempt fail loudly, original cause intact. Backing off
//! between attempts keeps a struggling service from being flooded with
//! immediate re-requests.

use std::{
    sync::atomic::{AtomicU32, Ordering},
    time::Duration,
};

use asyncell::{
    Promise, PromiseExt,
    retry::{RetryPolicy, retry},
    timer,
};

#[derive(Debug)]
struct ServiceDown(u32);

impl std::fmt::Display for ServiceDown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "service unavailable (attempt {})", self.0)
    }
}

impl std::error::Error for ServiceDown {}

#[tokio::main]
async fn main() {
    let attempts = AtomicU32::new(0);

    // Fails twice, then recovers.
    let policy = RetryPolicy::exponential(Duration::from_millis(100), 3);
    let body = retry(policy, || {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
        println!("Attempt {attempt}...");
        if attempt < 3 {
            Promise::rejected(ServiceDown(attempt))
        } else {
            Promise::resolved("response body")
        }
    })
    .await
    .unwrap();
    println!("Downloaded: {body}");

    // A slow operation behind a deadline: `None` means the timer won, and the
    // operation itself keeps running unobserved.
    let slow = timer::delay_value("eventually", Duration::from_secs(2));
    match slow.with_timeout(Duration::from_millis(300)).wait().await.unwrap() {
        Some(value) => println!("Answered in time: {value}"),
        None => println!("No answer within 300ms, giving up"),
    }
}
