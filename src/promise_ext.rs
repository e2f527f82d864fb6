use std::time::Duration;

use crate::{combine, promise::Promise};

/// Extend `Promise` with combinator shorthands.
pub trait PromiseExt<T>: Sized {
    /// Races this promise against a timer, as
    /// [`race_with_timeout`](combine::race_with_timeout).
    fn with_timeout(self, limit: Duration) -> Promise<Option<T>>;
}

impl<T: Clone + Send + 'static> PromiseExt<T> for Promise<T> {
    fn with_timeout(self, limit: Duration) -> Promise<Option<T>> {
        combine::race_with_timeout(self, limit)
    }
}
