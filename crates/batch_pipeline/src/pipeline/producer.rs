//! src/pipeline/producer.rs
//!
//! Producer side of the pipeline: enqueues items in order, assigns
//! sequence numbers, and terminates the stream with exactly one `Done`
//! marker, including after a generation failure.

use anyhow::Result;
use tracing::debug;

use crate::pipeline::queue::{Entry, WorkItem, WorkQueue};

/// A fallible source of work items.
///
/// Implementors hand the pipeline a lazy iterator; the producer pulls from
/// it one item at a time, so backpressure from a full queue reaches all the
/// way back into item generation.
pub trait WorkSource<T>: Send {
    /// Opens the source and returns the item stream.
    ///
    /// Both opening and individual items may fail. An item-level `Err`
    /// stops the run at that point; items yielded before it are still
    /// processed.
    fn stream(&self) -> Result<Box<dyn Iterator<Item = Result<T>> + Send>>;
}

/// What the producer thread hands back to the coordinator.
pub(crate) struct ProducerOutcome {
    /// Number of items enqueued before the loop ended.
    pub(crate) enqueued: usize,
    /// Generation or source-open failure, if any.
    pub(crate) failure: Option<anyhow::Error>,
}

/// Runs the producer loop over an already-open item stream.
pub(crate) fn run_producer<T>(
    queue: &WorkQueue<T>,
    items: impl Iterator<Item = Result<T>>,
) -> ProducerOutcome {
    let mut enqueued: usize = 0;
    let mut failure = None;

    for item in items {
        match item {
            Ok(payload) => {
                let entry = Entry::Item(WorkItem {
                    seq: enqueued as u64,
                    payload,
                });
                if queue.put(entry).is_err() {
                    // A stop flag is raised; it unblocks the consumers too,
                    // so no marker is needed.
                    debug!(enqueued, "producer interrupted");
                    return ProducerOutcome { enqueued, failure };
                }
                enqueued += 1;
            }
            Err(e) => {
                debug!(enqueued, error = %format!("{e:#}"), "item generation failed");
                failure = Some(e);
                break;
            }
        }
    }

    // Terminate the stream exactly once, on the failure path as well, so no
    // consumer blocks forever on an empty queue.
    let _ = queue.put(Entry::Done);
    debug!(enqueued, "producer finished, marker enqueued");
    ProducerOutcome { enqueued, failure }
}

/// Opens a `WorkSource` and runs the producer loop over its stream.
pub(crate) fn run_source_producer<T>(
    queue: &WorkQueue<T>,
    source: impl WorkSource<T>,
) -> ProducerOutcome {
    match source.stream() {
        Ok(items) => run_producer(queue, items),
        Err(e) => {
            debug!(error = %format!("{e:#}"), "source failed to open");
            let _ = queue.put(Entry::Done);
            ProducerOutcome {
                enqueued: 0,
                failure: Some(e),
            }
        }
    }
}
