//! Single-assignment promise cells and completion combinators.
//!
//! `asyncell` provides lightweight primitives for composing already-started
//! asynchronous operations in Rust: pausing, returning completed results,
//! reporting progress, waiting for all or any of a set of operations, and
//! processing results in completion order.
//!
//! The crate is designed to work independently of any specific async runtime,
//! making it flexible and adaptable to various execution environments.
//!
//! Features include:
//! - A `Promise` cell that settles exactly once and can be observed by any
//!   number of concurrent waiters
//! - Timers that deliver a value after a pause, raced and combined like any
//!   other promise
//! - Combinators for waiting on whole sets (`all`), the first finisher
//!   (`any`), timeout races, and completion-ordered consumption
//! - A progress channel with an explicit, pluggable delivery context
//! - A retry runner with exponential backoff that lets the final failure
//!   propagate untouched
//!
//! All components are modular and designed for composability, making it
//! easier to build expressive and maintainable async systems.

pub mod combine;
pub mod ordered;
pub mod progress;
pub mod promise;
pub mod promise_ext;
pub mod retry;
pub mod timer;

pub use combine::{LoserPolicy, all, any, any_with, race_with_timeout};
pub use promise::{Cause, Outcome, Promise, TaskError, Wait};
pub use promise_ext::PromiseExt;
pub use retry::{RetryPolicy, retry};
pub use timer::{delay, delay_value};
