//! Processing results as they complete.
//!
//! `ordered` returns one slot per input; slot `i` settles with the outcome of
//! the `i`-th input to finish. Awaiting the slots front to back processes each
//! result the moment it exists, without waiting for the slower inputs and
//! without re-scanning the remaining set on every completion.

use std::time::{Duration, Instant};

use asyncell::{ordered, timer};

#[tokio::main]
async fn main() {
    let started = Instant::now();

    let slots = ordered::ordered(vec![
        timer::delay_value(3, Duration::from_millis(900)),
        timer::delay_value(1, Duration::from_millis(300)),
        timer::delay_value(2, Duration::from_millis(600)),
    ]);

    for slot in slots {
        let value = slot.wait().await.unwrap();
        println!("Got {value} after {:?}", started.elapsed());
    }
}
