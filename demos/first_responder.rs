//! Waiting for the first of several operations.
//!
//! `any` settles as soon as one input finishes, in any terminal state, and
//! yields that input's position and handle. The winner's failure is not
//! propagated through the combinator; awaiting the handle is how the caller
//! decides what a failed first responder means. Losing inputs are abandoned by
//! default, which is fine when their results are worthless once a winner
//! exists; `LoserPolicy::Cancel` marks them cancelled instead.

use std::time::Duration;

use asyncell::{LoserPolicy, combine, timer};

#[tokio::main]
async fn main() {
    // Two mirrors race; only the first answer matters.
    let mirrors = vec![
        timer::delay_value("answer from mirror A", Duration::from_millis(250)),
        timer::delay_value("answer from mirror B", Duration::from_millis(100)),
    ];

    let (index, winner) = combine::any(mirrors).wait().await.unwrap();
    println!("Mirror {index} answered first: {}", winner.wait().await.unwrap());

    // Same race, but the loser is told to stand down.
    let mirrors = vec![
        timer::delay_value("A", Duration::from_millis(250)),
        timer::delay_value("B", Duration::from_millis(100)),
    ];
    let loser = mirrors[0].clone();

    let (index, _) = combine::any_with(mirrors, LoserPolicy::Cancel)
        .wait()
        .await
        .unwrap();
    println!("Mirror {index} won; loser ended as {:?}", loser.wait().await);
}
