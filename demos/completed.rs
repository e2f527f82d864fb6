//! Returning completed promises.
//!
//! A synchronous implementation of an asynchronous signature hands back an
//! already-settled cell. Typical when stubbing an async interface in tests or
//! serving a value straight from a cache.

use asyncell::Promise;

#[derive(Debug)]
struct Unreachable;

impl std::fmt::Display for Unreachable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "backend unreachable")
    }
}

impl std::error::Error for Unreachable {}

trait QuoteSource {
    fn quote(&self) -> Promise<u32>;
}

struct FixedQuotes;

impl QuoteSource for FixedQuotes {
    // Synchronous answer, asynchronous signature.
    fn quote(&self) -> Promise<u32> {
        Promise::resolved(13)
    }
}

struct DownedQuotes;

impl QuoteSource for DownedQuotes {
    fn quote(&self) -> Promise<u32> {
        Promise::rejected(Unreachable)
    }
}

#[tokio::main]
async fn main() {
    let healthy: &dyn QuoteSource = &FixedQuotes;
    let downed: &dyn QuoteSource = &DownedQuotes;

    println!("Stubbed quote: {:?}", healthy.quote().wait().await);
    println!("Stubbed outage: {:?}", downed.quote().wait().await);
}
