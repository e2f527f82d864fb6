//! Defines the `Promise` cell and the crate's error taxonomy.
//!
//! A `Promise<T>` is a single-assignment, observable result cell: it is created
//! pending, transitioned to a terminal state exactly once by its producer, and
//! read any number of times by consumers. Handles are cheap clones of the same
//! cell, so an operation can hand its promise to several observers while it
//! keeps resolving rights for itself.
//!
//! This module also provides `Wait`, the future returned by [`Promise::wait`],
//! and [`Outcome`], the cloneable snapshot of a settled cell that combinators
//! transfer between promises.

use std::{
    fmt, mem,
    pin::Pin,
    sync::{Arc, Mutex},
    task::{Context, Poll, Waker},
};

/// A cloneable, type-erased failure cause captured by [`Promise::reject`].
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Represents the ways a promise, or a combinator over promises, can fail.
///
/// The same type covers outcome errors observed through [`Promise::wait`]
/// (`Failed`, `Cancelled`, `Aggregate`, `EmptyInputSet`) and producer usage
/// errors returned by the transition methods (`AlreadyResolved`).
#[derive(Clone, Debug)]
pub enum TaskError {
    /// The operation behind the promise failed with the captured cause.
    Failed(Cause),

    /// The promise was cancelled before it produced a value.
    Cancelled,

    /// A transition was attempted on a cell that is already terminal.
    AlreadyResolved,

    /// A combinator that needs at least one input was given none.
    EmptyInputSet,

    /// Several inputs of [`all`](crate::combine::all) failed. Each entry keeps
    /// the failing input's position, in input order.
    Aggregate(Vec<(usize, TaskError)>),
}

impl TaskError {
    /// Wraps an arbitrary error value as a `Failed` task error.
    pub fn failed<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TaskError::Failed(Arc::new(error))
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Failed(cause) => write!(f, "Operation failed: {cause}"),
            TaskError::Cancelled => write!(f, "Operation was cancelled"),
            TaskError::AlreadyResolved => write!(f, "Promise was already settled"),
            TaskError::EmptyInputSet => write!(f, "No input promises were given"),
            TaskError::Aggregate(errors) => {
                write!(f, "{} operation(s) failed", errors.len())
            }
        }
    }
}

impl std::error::Error for TaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaskError::Failed(cause) => {
                Some(&**cause as &(dyn std::error::Error + 'static))
            }
            TaskError::Aggregate(errors) => errors
                .first()
                .map(|(_, error)| error as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

/// The terminal state of a settled promise.
///
/// Combinators receive outcomes from the cells they observe and transfer them
/// into the cells they produce, so values, errors, and cancellations survive
/// composition unchanged.
#[derive(Clone, Debug)]
pub enum Outcome<T> {
    /// The producer resolved the promise with a value.
    Success(T),

    /// The producer rejected the promise.
    Failure(TaskError),

    /// The promise was cancelled.
    Cancelled,
}

impl<T: Clone> Outcome<T> {
    fn to_result(&self) -> Result<T, TaskError> {
        match self {
            Outcome::Success(value) => Ok(value.clone()),
            Outcome::Failure(error) => Err(error.clone()),
            Outcome::Cancelled => Err(TaskError::Cancelled),
        }
    }
}

type Watcher<T> = Box<dyn FnOnce(Outcome<T>) + Send>;

// Waiting side of the cell. Wakers are woken in registration order when the
// cell settles; watchers run on the settling thread, after the lock is
// released.
enum Lifecycle<T> {
    Pending {
        wakers: Vec<Waker>,
        watchers: Vec<Watcher<T>>,
    },
    Done(Outcome<T>),
}

struct Shared<T> {
    cell: Mutex<Lifecycle<T>>,
}

/// A single-assignment asynchronous result cell.
///
/// A promise starts pending and settles exactly once, into one of three
/// terminal states: succeeded, failed, or cancelled. The producer settles it
/// through [`resolve`], [`reject`], or [`cancel`]; consumers observe it through
/// [`wait`], which any number of them may do concurrently. Once terminal, the
/// stored outcome never changes and a second transition attempt returns
/// [`TaskError::AlreadyResolved`].
///
/// Cloning a `Promise` clones the handle, not the cell. All clones refer to the
/// same pending or settled result, which is what lets an already-started
/// operation be raced, aggregated, and awaited from several places at once.
///
/// Cancellation is cooperative. [`cancel`] marks the cell so every waiter sees
/// [`TaskError::Cancelled`], but work already running behind the promise is not
/// interrupted; its later attempt to resolve simply reports `AlreadyResolved`.
///
/// [`resolve`]: Promise::resolve
/// [`reject`]: Promise::reject
/// [`cancel`]: Promise::cancel
/// [`wait`]: Promise::wait
pub struct Promise<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Promise<T> {
    /// Creates a new pending promise.
    #[must_use]
    pub fn new() -> Self {
        Promise {
            shared: Arc::new(Shared {
                cell: Mutex::new(Lifecycle::Pending {
                    wakers: Vec::new(),
                    watchers: Vec::new(),
                }),
            }),
        }
    }

    /// Returns `true` once the promise has reached a terminal state.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(&*self.shared.cell.lock().unwrap(), Lifecycle::Done(_))
    }

    /// Returns `true` if both handles refer to the same cell.
    ///
    /// This is the identity [`any`](crate::combine::any) reports: the handle it
    /// yields compares equal to the caller's own handle for the winning input.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.shared, &b.shared)
    }
}

impl<T: Clone> Promise<T> {
    /// Returns a promise that is already resolved with `value`.
    ///
    /// Useful when an asynchronous signature has to be satisfied by a value
    /// that is available synchronously, such as a stub for an async interface
    /// or a cached result.
    ///
    /// # Example
    /// ```
    /// use asyncell::Promise;
    ///
    /// let stub = Promise::resolved(42u32);
    /// # async {
    /// assert_eq!(stub.wait().await.unwrap(), 42);
    /// # };
    /// ```
    #[must_use]
    pub fn resolved(value: T) -> Self {
        let promise = Promise::new();
        let _ = promise.settle(Outcome::Success(value));
        promise
    }

    /// Returns a promise that is already failed with `error`.
    #[must_use]
    pub fn rejected<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let promise = Promise::new();
        let _ = promise.settle(Outcome::Failure(TaskError::failed(error)));
        promise
    }

    /// Returns a promise that is already cancelled.
    #[must_use]
    pub fn cancelled() -> Self {
        let promise = Promise::new();
        let _ = promise.settle(Outcome::Cancelled);
        promise
    }

    /// Settles the promise with a value.
    ///
    /// Every waiter currently suspended in [`wait`](Promise::wait) is released,
    /// in the order the waits began.
    ///
    /// # Errors
    ///
    /// [`TaskError::AlreadyResolved`] if the promise is already terminal. The
    /// stored outcome is left untouched.
    pub fn resolve(&self, value: T) -> Result<(), TaskError> {
        self.settle(Outcome::Success(value))
    }

    /// Settles the promise with a failure cause.
    ///
    /// Each waiter observes the same captured cause through
    /// [`TaskError::Failed`].
    ///
    /// # Errors
    ///
    /// [`TaskError::AlreadyResolved`] if the promise is already terminal.
    pub fn reject<E>(&self, error: E) -> Result<(), TaskError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.settle(Outcome::Failure(TaskError::failed(error)))
    }

    /// Marks the promise as cancelled.
    ///
    /// Cancellation is a state transition, not an interruption: the producer
    /// keeps running until it observes the cell is settled, at which point its
    /// own `resolve` or `reject` reports `AlreadyResolved` and its result is
    /// discarded.
    ///
    /// # Errors
    ///
    /// [`TaskError::AlreadyResolved`] if the promise is already terminal.
    pub fn cancel(&self) -> Result<(), TaskError> {
        self.settle(Outcome::Cancelled)
    }

    /// Returns a snapshot of the terminal state, or `None` while pending.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome<T>> {
        match &*self.shared.cell.lock().unwrap() {
            Lifecycle::Done(outcome) => Some(outcome.clone()),
            Lifecycle::Pending { .. } => None,
        }
    }

    /// Suspends until the promise settles.
    ///
    /// Resolves to the value on success, to the captured error on failure, and
    /// to [`TaskError::Cancelled`] on cancellation. Waiting consumes nothing:
    /// any number of `wait` futures may observe the same cell concurrently and
    /// all of them are satisfied by the single transition.
    ///
    /// A `Promise` also implements `IntoFuture`, so a handle can be `.await`ed
    /// directly.
    #[must_use = "futures do nothing unless polled or .awaited"]
    pub fn wait(&self) -> Wait<T> {
        Wait {
            shared: Arc::clone(&self.shared),
            slot: None,
        }
    }

    // Transitions the cell out of `Pending`. The lock is released before
    // wakers are woken and watchers run, so a watcher may settle other
    // promises without re-entering this cell.
    pub(crate) fn settle(&self, outcome: Outcome<T>) -> Result<(), TaskError> {
        let mut cell = self.shared.cell.lock().unwrap();
        if matches!(&*cell, Lifecycle::Done(_)) {
            return Err(TaskError::AlreadyResolved);
        }
        let previous = mem::replace(&mut *cell, Lifecycle::Done(outcome.clone()));
        drop(cell);
        if let Lifecycle::Pending { wakers, watchers } = previous {
            for waker in wakers {
                waker.wake();
            }
            for watcher in watchers {
                watcher(outcome.clone());
            }
        }
        Ok(())
    }

    // Registers a terminal callback. Runs immediately, on the current thread,
    // if the cell is already settled; otherwise it runs on the settling
    // thread. One registration costs O(1) dispatch work at completion, which
    // is what keeps `ordered` linear.
    pub(crate) fn watch(&self, watcher: impl FnOnce(Outcome<T>) + Send + 'static) {
        let mut cell = self.shared.cell.lock().unwrap();
        match &mut *cell {
            Lifecycle::Pending { watchers, .. } => watchers.push(Box::new(watcher)),
            Lifecycle::Done(outcome) => {
                let outcome = outcome.clone();
                drop(cell);
                watcher(outcome);
            }
        }
    }

    // Settles with a pre-built task error. Combinators use this for their own
    // failure modes, `EmptyInputSet` and `Aggregate`.
    pub(crate) fn fail(&self, error: TaskError) -> Result<(), TaskError> {
        self.settle(Outcome::Failure(error))
    }
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Promise {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.shared.cell.lock().unwrap() {
            Lifecycle::Pending { .. } => "Pending",
            Lifecycle::Done(Outcome::Success(_)) => "Succeeded",
            Lifecycle::Done(Outcome::Failure(_)) => "Failed",
            Lifecycle::Done(Outcome::Cancelled) => "Cancelled",
        };
        f.debug_struct("Promise").field("state", &state).finish()
    }
}

impl<T: Clone> IntoFuture for Promise<T> {
    type Output = Result<T, TaskError>;
    type IntoFuture = Wait<T>;

    fn into_future(self) -> Wait<T> {
        Wait {
            shared: self.shared,
            slot: None,
        }
    }
}

/// A future that suspends until a promise settles.
///
/// Returned by [`Promise::wait`]. Each `Wait` registers its own waker with the
/// cell, so independent waiters are woken independently, in the order they
/// first polled.
#[must_use = "futures do nothing unless polled or .awaited"]
pub struct Wait<T> {
    shared: Arc<Shared<T>>,
    slot: Option<usize>,
}

impl<T: Clone> Future for Wait<T> {
    type Output = Result<T, TaskError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut cell = this.shared.cell.lock().unwrap();
        match &mut *cell {
            Lifecycle::Done(outcome) => Poll::Ready(outcome.to_result()),
            Lifecycle::Pending { wakers, .. } => {
                match this.slot {
                    Some(index) => wakers[index] = cx.waker().clone(),
                    None => {
                        wakers.push(cx.waker().clone());
                        this.slot = Some(wakers.len() - 1);
                    }
                }
                Poll::Pending
            }
        }
    }
}
