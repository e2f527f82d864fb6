//! Combinators over already-started promises.
//!
//! All combinators here only observe their inputs. A `Promise` is a handle to
//! work that is already running, so none of these functions start, stop, or
//! poll anything themselves; they register one terminal callback per input and
//! settle a combined cell when enough inputs have reported. Lazily built
//! collections of not-yet-started operations must be materialized by the
//! caller before being handed in.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use crate::{
    promise::{Outcome, Promise, TaskError},
    timer,
};

/// What [`any_with`] does with the inputs that did not finish first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoserPolicy {
    /// Leave losing inputs running. They settle on their own schedule and
    /// their results and errors are discarded unless the caller still holds
    /// handles and awaits them.
    #[default]
    Abandon,

    /// Cancel every losing input as soon as the winner is known. Work behind a
    /// cancelled input keeps running until it observes its settled cell.
    Cancel,
}

/// Waits for every input to succeed, preserving input order.
///
/// The combined promise resolves with the values of all inputs, positionally
/// aligned with the input sequence, once the last input settles. Failures are
/// never collapsed to the first one seen: if one or more inputs fail, the
/// combined promise fails with [`TaskError::Aggregate`] carrying every failing
/// input's error together with its position, in input order. If at least one
/// input is cancelled and none failed, the combined promise is cancelled.
///
/// An empty input sequence resolves immediately with an empty vector.
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use asyncell::{combine, timer};
///
/// let slow = timer::delay_value(1, Duration::from_millis(30));
/// let fast = timer::delay_value(2, Duration::from_millis(10));
///
/// # async {
/// // Values arrive in input order, not completion order.
/// assert_eq!(combine::all([slow, fast]).wait().await.unwrap(), vec![1, 2]);
/// # };
/// ```
pub fn all<T, I>(inputs: I) -> Promise<Vec<T>>
where
    T: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    let inputs: Vec<Promise<T>> = inputs.into_iter().collect();
    if inputs.is_empty() {
        return Promise::resolved(Vec::new());
    }

    let combined = Promise::new();
    let remaining = Arc::new(AtomicUsize::new(inputs.len()));
    let outcomes: Arc<Mutex<Vec<Option<Outcome<T>>>>> =
        Arc::new(Mutex::new(vec![None; inputs.len()]));

    for (index, input) in inputs.iter().enumerate() {
        let combined = combined.clone();
        let remaining = Arc::clone(&remaining);
        let outcomes = Arc::clone(&outcomes);
        input.watch(move |outcome| {
            outcomes.lock().unwrap()[index] = Some(outcome);
            // The last input to report settles the combined cell.
            if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                let _ = combined.settle(combine_outcomes(&outcomes));
            }
        });
    }
    combined
}

fn combine_outcomes<T: Clone>(outcomes: &Mutex<Vec<Option<Outcome<T>>>>) -> Outcome<Vec<T>> {
    let mut slots = outcomes.lock().unwrap();
    let mut values = Vec::with_capacity(slots.len());
    let mut failures = Vec::new();
    let mut cancelled = false;
    for (index, slot) in slots.iter_mut().enumerate() {
        match slot.take() {
            Some(Outcome::Success(value)) => values.push(value),
            Some(Outcome::Failure(error)) => failures.push((index, error)),
            Some(Outcome::Cancelled) => cancelled = true,
            None => {}
        }
    }
    if !failures.is_empty() {
        Outcome::Failure(TaskError::Aggregate(failures))
    } else if cancelled {
        Outcome::Cancelled
    } else {
        Outcome::Success(values)
    }
}

/// Waits for the first input to settle, in any terminal state.
///
/// Resolves with the position and handle of the first input to finish,
/// whether it succeeded, failed, or was cancelled. The winner's failure is
/// deliberately not propagated through the combined promise; callers decide
/// what a failed first responder means by awaiting the returned handle.
///
/// Losing inputs are abandoned: neither cancelled nor awaited here. They run
/// to completion and their outcomes are silently discarded unless the caller
/// keeps handles of its own. Use [`any_with`] and [`LoserPolicy::Cancel`] when
/// abandonment is not acceptable.
///
/// # Errors
///
/// The combined promise fails with [`TaskError::EmptyInputSet`] when `inputs`
/// is empty, rather than never settling.
///
/// Repeatedly calling `any` on a shrinking set to consume promises in
/// completion order costs O(n²) dispatch work; [`ordered`](crate::ordered::ordered)
/// does the same job in O(n).
pub fn any<T, I>(inputs: I) -> Promise<(usize, Promise<T>)>
where
    T: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    any_with(inputs, LoserPolicy::Abandon)
}

/// [`any`] with an explicit policy for the losing inputs.
pub fn any_with<T, I>(inputs: I, policy: LoserPolicy) -> Promise<(usize, Promise<T>)>
where
    T: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<T>>,
{
    let inputs: Arc<Vec<Promise<T>>> = Arc::new(inputs.into_iter().collect());
    let winner = Promise::new();
    if inputs.is_empty() {
        let _ = winner.fail(TaskError::EmptyInputSet);
        return winner;
    }

    for (index, input) in inputs.iter().enumerate() {
        let winner = winner.clone();
        let inputs = Arc::clone(&inputs);
        input.watch(move |_| {
            if winner.resolve((index, inputs[index].clone())).is_err() {
                // A sibling settled the combined cell first.
                return;
            }
            if policy == LoserPolicy::Cancel {
                for (other, loser) in inputs.iter().enumerate() {
                    if other != index {
                        let _ = loser.cancel();
                    }
                }
            }
        });
    }
    winner
}

/// Races `operation` against a timer.
///
/// Resolves with `None` if the timer wins, with `Some(value)` if the operation
/// wins and succeeded, and with the operation's own error if it wins and
/// failed. When the operation wins, the losing timer is cancelled so its cell
/// settles early.
///
/// A timed-out operation is not stopped, merely ignored; it keeps running and
/// its eventual outcome is discarded unless the caller kept a handle. An
/// explicit cancellation signal threaded into the operation is the stronger
/// alternative when the work itself must stop at the deadline.
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use asyncell::{combine, timer};
///
/// let slow = timer::delay_value("late", Duration::from_secs(1));
///
/// # async {
/// let raced = combine::race_with_timeout(slow.clone(), Duration::from_millis(50));
/// assert_eq!(raced.wait().await.unwrap(), None);
/// // `slow` is abandoned, not cancelled; it still completes on its own.
/// assert_eq!(slow.wait().await.unwrap(), "late");
/// # };
/// ```
pub fn race_with_timeout<T>(operation: Promise<T>, limit: Duration) -> Promise<Option<T>>
where
    T: Clone + Send + 'static,
{
    let raced = Promise::new();
    let pause = timer::delay(limit);

    let settled = raced.clone();
    let timer_cell = pause.clone();
    operation.watch(move |outcome| {
        let first = match outcome {
            Outcome::Success(value) => settled.resolve(Some(value)),
            Outcome::Failure(error) => settled.fail(error),
            Outcome::Cancelled => settled.cancel(),
        };
        if first.is_ok() {
            let _ = timer_cell.cancel();
        }
    });

    let settled = raced.clone();
    pause.watch(move |outcome| {
        if let Outcome::Success(()) = outcome {
            let _ = settled.resolve(None);
        }
    });

    raced
}
