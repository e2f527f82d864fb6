//! The same primitives under a different executor.
//!
//! Promises carry their own completion machinery, so nothing here depends on
//! tokio; the whole crate runs unchanged under smol.

use std::time::Duration;

use asyncell::{combine, timer};
use macro_rules_attribute::apply;
use smol::Timer;
use smol_macros::main;

#[apply(main!)]
async fn main() {
    Timer::after(Duration::from_millis(10)).await;

    let combined = combine::all(vec![
        timer::delay_value(1, Duration::from_millis(300)),
        timer::delay_value(2, Duration::from_millis(100)),
    ]);

    println!("Joined under smol: {:?}", combined.wait().await.unwrap());

    let (index, winner) = combine::any(vec![
        timer::delay_value("slow", Duration::from_millis(300)),
        timer::delay_value("fast", Duration::from_millis(100)),
    ])
    .wait()
    .await
    .unwrap();

    println!("Input {index} won: {}", winner.wait().await.unwrap());
}
