//! Reporting progress from a running operation.
//!
//! The operation takes the producer half of a progress channel, optionally.
//! `None` must be a complete no-op, so callers that do not care about progress
//! pay nothing. Reports are delivered to the single observer in emission
//! order, on the channel's delivery context, while the operation keeps
//! running; report values should be immutable or value-like for that reason.

use std::time::Duration;

use asyncell::progress::{self, Progress};

async fn transfer(progress: Option<&Progress<f64>>) {
    let mut percent_complete = 0.0;
    while percent_complete < 100.0 {
        tokio::time::sleep(Duration::from_millis(50)).await;
        percent_complete += 20.0;
        if let Some(progress) = progress {
            progress.report(percent_complete);
        }
    }
}

#[tokio::main]
async fn main() {
    // Nobody watching: the operation runs unchanged.
    transfer(None).await;
    println!("Silent transfer done");

    let (reporter, channel) = progress::channel();
    let drained = channel.subscribe(|percent| println!("Transferred {percent:.0}%"));

    transfer(Some(&reporter)).await;
    drop(reporter);

    drained.wait().await.unwrap();
    println!("Watched transfer done");
}
