//! Waiting for a whole set of operations.
//!
//! `all` resolves with every value, positionally aligned with its inputs, and
//! never hides a partial failure: when inputs fail, the combined promise
//! carries every captured error with the failing input's position.

use std::time::Duration;

use asyncell::{Promise, TaskError, combine, timer};

#[derive(Debug)]
struct FetchError(&'static str);

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "could not fetch {}", self.0)
    }
}

impl std::error::Error for FetchError {}

#[tokio::main]
async fn main() {
    // All three succeed: values come back in input order even though the
    // middle one finishes first.
    let pages = combine::all(vec![
        timer::delay_value("<html>a</html>", Duration::from_millis(300)),
        timer::delay_value("<html>b</html>", Duration::from_millis(100)),
        timer::delay_value("<html>c</html>", Duration::from_millis(200)),
    ]);
    println!("Downloaded: {:?}", pages.wait().await.unwrap());

    // Two of three fail: the aggregate keeps both causes and their positions.
    let mixed = combine::all(vec![
        Promise::rejected(FetchError("a")),
        timer::delay_value("<html>b</html>", Duration::from_millis(50)),
        Promise::rejected(FetchError("c")),
    ]);
    match mixed.wait().await {
        Err(TaskError::Aggregate(errors)) => {
            for (position, error) in errors {
                println!("Input {position} failed: {error}");
            }
        }
        other => println!("Unexpected outcome: {other:?}"),
    }
}
