//! Bounded FIFO work queue shared by the producer and all consumers.
//!
//! Entries are either sequenced work items or the single `Done` marker that
//! terminates the stream. Blocking `put`/`get` re-check the cancellation
//! and abort flags every poll interval, so no thread stays blocked longer
//! than one interval after a flag is raised.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, SendTimeoutError};
use tracing::trace;

use crate::pipeline::cancel::CancellationToken;

/// A sequenced payload flowing through the queue.
#[derive(Debug)]
pub(crate) struct WorkItem<T> {
    pub(crate) seq: u64,
    pub(crate) payload: T,
}

/// Queue entry: a work item or the end-of-stream marker.
#[derive(Debug)]
pub(crate) enum Entry<T> {
    Item(WorkItem<T>),
    Done,
}

/// Why a blocked queue operation gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interrupted {
    /// The caller's cancellation token was triggered.
    Cancelled,
    /// A fail-fast consumer raised the internal abort flag.
    Aborted,
}

/// Bounded multi-producer multi-consumer FIFO queue.
///
/// Holds both channel ends so the `Done` marker can circulate: any consumer
/// that receives it can put it back for its peers. The queue never
/// disconnects while it is alive.
pub(crate) struct WorkQueue<T> {
    tx: Sender<Entry<T>>,
    rx: Receiver<Entry<T>>,
    poll_interval: Duration,
    cancel: CancellationToken,
    abort: CancellationToken,
}

impl<T> WorkQueue<T> {
    pub(crate) fn new(
        capacity: usize,
        poll_interval: Duration,
        cancel: CancellationToken,
        abort: CancellationToken,
    ) -> Self {
        debug_assert!(capacity > 0, "queue capacity validated at construction");
        let (tx, rx) = bounded(capacity);
        Self {
            tx,
            rx,
            poll_interval,
            cancel,
            abort,
        }
    }

    /// Blocking enqueue with backpressure.
    ///
    /// Waits while the queue is full, re-checking the stop flags every poll
    /// interval. Returns the interruption reason if a flag is raised before
    /// the entry is accepted.
    pub(crate) fn put(&self, entry: Entry<T>) -> Result<(), Interrupted> {
        let mut entry = entry;
        loop {
            if let Some(reason) = self.interrupted() {
                return Err(reason);
            }
            match self.tx.send_timeout(entry, self.poll_interval) {
                Ok(()) => return Ok(()),
                Err(SendTimeoutError::Timeout(returned)) => {
                    trace!("queue full, re-checking stop flags");
                    entry = returned;
                }
                // The queue owns its receiver, so the channel cannot
                // disconnect while `self` is alive.
                Err(SendTimeoutError::Disconnected(_)) => {
                    unreachable!("work queue receiver dropped while queue alive")
                }
            }
        }
    }

    /// Blocking dequeue.
    ///
    /// Waits while the queue is empty, re-checking the stop flags every
    /// poll interval.
    pub(crate) fn get(&self) -> Result<Entry<T>, Interrupted> {
        loop {
            if let Some(reason) = self.interrupted() {
                return Err(reason);
            }
            match self.rx.recv_timeout(self.poll_interval) {
                Ok(entry) => return Ok(entry),
                Err(RecvTimeoutError::Timeout) => {
                    trace!("queue empty, re-checking stop flags");
                }
                Err(RecvTimeoutError::Disconnected) => {
                    unreachable!("work queue sender dropped while queue alive")
                }
            }
        }
    }

    /// Non-blocking dequeue, used by the coordinator's final drain.
    pub(crate) fn try_get(&self) -> Option<Entry<T>> {
        self.rx.try_recv().ok()
    }

    /// Raises the internal abort flag. Unblocks every thread waiting on
    /// this queue within one poll interval.
    pub(crate) fn abort(&self) {
        self.abort.cancel();
    }

    /// Cancellation takes precedence over abort when both are raised.
    fn interrupted(&self) -> Option<Interrupted> {
        if self.cancel.is_cancelled() {
            Some(Interrupted::Cancelled)
        } else if self.abort.is_cancelled() {
            Some(Interrupted::Aborted)
        } else {
            None
        }
    }
}
