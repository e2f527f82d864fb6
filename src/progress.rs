//! Progress reporting for in-flight operations.
//!
//! An operation that wants to surface intermediate values takes the producer
//! half of a progress channel and calls [`Progress::report`] as it goes. The
//! consumer half delivers every report, in emission order, to a single
//! observer on a configurable [`DeliveryContext`].
//!
//! Reporting is asynchronous with respect to the observer: the producer
//! continues before the observer has processed the value. Report types should
//! therefore be immutable or value-like; the channel does not copy a shared
//! payload on the producer's behalf.
//!
//! By convention a progress parameter is optional. An operation accepting
//! `Option<&Progress<T>>` must treat `None` as a complete no-op, never an
//! error.

use std::{pin::Pin, sync::Arc};

use futures::{StreamExt, channel::mpsc, executor::ThreadPool};

use crate::{promise::Promise, timer};

/// Where progress reports are delivered.
///
/// The context is an explicit capability passed at channel construction, not
/// an ambient thread-local captured behind the caller's back. An application
/// that must observe progress on a particular loop, a UI dispatcher for
/// instance, implements this trait over that loop's spawn primitive.
pub trait DeliveryContext: Send + Sync {
    /// Schedules the delivery pump on this context.
    fn spawn(&self, work: Pin<Box<dyn Future<Output = ()> + Send + 'static>>);
}

/// The default delivery context, backed by the crate's shared thread pool.
pub struct PoolContext;

impl DeliveryContext for PoolContext {
    fn spawn(&self, work: Pin<Box<dyn Future<Output = ()> + Send + 'static>>) {
        timer::shared_pool().spawn_ok(work);
    }
}

impl DeliveryContext for ThreadPool {
    fn spawn(&self, work: Pin<Box<dyn Future<Output = ()> + Send + 'static>>) {
        self.spawn_ok(work);
    }
}

/// Creates a progress channel delivering on the shared thread pool.
pub fn channel<T>() -> (Progress<T>, ProgressChannel<T>) {
    channel_in(Arc::new(PoolContext))
}

/// Creates a progress channel delivering on an explicit context.
pub fn channel_in<T>(context: Arc<dyn DeliveryContext>) -> (Progress<T>, ProgressChannel<T>) {
    let (reports, queue) = mpsc::unbounded();
    (
        Progress { reports },
        ProgressChannel {
            queue,
            context,
        },
    )
}

/// The producer half of a progress channel.
///
/// Cheap to clone; an operation may hand copies to sub-steps. Reports from a
/// single producer are delivered in the order they were issued. Producers
/// reporting concurrently interleave without any ordering guarantee between
/// them.
pub struct Progress<T> {
    reports: mpsc::UnboundedSender<T>,
}

impl<T> Progress<T> {
    /// Queues a progress value, best effort.
    ///
    /// Never blocks and never fails from the producer's point of view: once
    /// the consumer half is gone the report is silently dropped.
    pub fn report(&self, value: T) {
        let _ = self.reports.unbounded_send(value);
    }
}

impl<T> Clone for Progress<T> {
    fn clone(&self) -> Self {
        Progress {
            reports: self.reports.clone(),
        }
    }
}

/// The consumer half of a progress channel.
pub struct ProgressChannel<T> {
    queue: mpsc::UnboundedReceiver<T>,
    context: Arc<dyn DeliveryContext>,
}

impl<T: Send + 'static> ProgressChannel<T> {
    /// Registers the single observer and starts delivery.
    ///
    /// The observer is invoked once per report, in emission order, on the
    /// channel's delivery context. Consuming `self` is what makes the observer
    /// unique; there is no second subscription to race with.
    ///
    /// The returned promise resolves once every [`Progress`] handle has been
    /// dropped and the queue has drained, which is the channel's completion
    /// signal.
    pub fn subscribe(self, mut observer: impl FnMut(T) + Send + 'static) -> Promise<()> {
        let drained = Promise::new();
        let finished = drained.clone();
        let mut queue = self.queue;
        self.context.spawn(Box::pin(async move {
            while let Some(value) = queue.next().await {
                observer(value);
            }
            let _ = finished.resolve(());
        }));
        drained
    }
}
