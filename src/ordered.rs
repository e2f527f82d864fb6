//! Re-orders a set of promises by completion time.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::promise::Promise;

/// Returns one slot promise per input, settling in completion order.
///
/// Slot `i` settles with the outcome of the `i`-th input **to finish**, not
/// the `i`-th input in the sequence. Values, errors, and cancellations are
/// transferred verbatim, so awaiting the slots front to back processes results
/// as they arrive while the remaining work keeps running.
///
/// Each input signals the next free slot through a single terminal callback
/// and a shared counter, so dispatch work is O(n) in total. The tempting
/// alternative, calling [`any`](crate::combine::any) in a loop over a
/// shrinking set, re-scans every remaining input per completion and degrades
/// to O(n²).
///
/// An empty input sequence yields an empty vector.
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use asyncell::{ordered, timer};
///
/// let inputs = vec![
///     timer::delay_value(3, Duration::from_millis(60)),
///     timer::delay_value(1, Duration::from_millis(20)),
///     timer::delay_value(2, Duration::from_millis(40)),
/// ];
///
/// # async {
/// let mut seen = Vec::new();
/// for slot in ordered::ordered(inputs) {
///     seen.push(slot.wait().await.unwrap());
/// }
/// assert_eq!(seen, vec![1, 2, 3]);
/// # };
/// ```
pub fn ordered<T, I>(inputs: I) -> Vec<Promise<T>>
where
    T: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    let inputs: Vec<Promise<T>> = inputs.into_iter().collect();
    let slots: Vec<Promise<T>> = (0..inputs.len()).map(|_| Promise::new()).collect();
    let claimed = Arc::new(AtomicUsize::new(0));
    let shared = Arc::new(slots.clone());

    for input in &inputs {
        let claimed = Arc::clone(&claimed);
        let slots = Arc::clone(&shared);
        input.watch(move |outcome| {
            // Each completion claims the next free slot exactly once.
            let slot = claimed.fetch_add(1, Ordering::AcqRel);
            let _ = slots[slot].settle(outcome);
        });
    }
    slots
}
