//! src/pipeline/consumer.rs
//!
//! Consumer side of the pipeline: drains the queue, runs the processor,
//! and propagates the end-of-stream marker to its peers.

use std::time::Instant;

use anyhow::Result;
use tracing::{debug, warn};

use crate::error::ErrorRecord;
use crate::pipeline::common::thread::CONSUMER_ID;
use crate::pipeline::queue::{Entry, Interrupted, WorkQueue};
use crate::pipeline::report::{ConsumerResult, ExitReason};

/// Runs one consumer loop until the marker arrives or a stop flag is
/// raised. Returns the consumer's tally for aggregation at join time.
pub(crate) fn run_consumer<T, R, F>(
    consumer: usize,
    queue: &WorkQueue<T>,
    processor: &F,
    fail_fast: bool,
) -> ConsumerResult
where
    F: Fn(T) -> Result<R>,
{
    CONSUMER_ID.with(|id| *id.borrow_mut() = consumer);

    let start = Instant::now();
    let mut result = ConsumerResult::new(consumer);

    loop {
        match queue.get() {
            Ok(Entry::Item(item)) => match processor(item.payload) {
                Ok(_) => {
                    result.processed += 1;
                    result.sequences.push(item.seq);
                }
                Err(e) => {
                    let message = format!("{e:#}");
                    warn!(consumer, seq = item.seq, error = %message, "item processing failed");
                    result.errors.push(ErrorRecord {
                        consumer,
                        seq: item.seq,
                        message,
                    });
                    if fail_fast {
                        queue.abort();
                        result.exit = ExitReason::Aborted;
                        break;
                    }
                }
            },
            Ok(Entry::Done) => {
                // The marker is the last entry the producer sends, so the
                // queue is empty here and the put cannot block on capacity.
                // It can only fail if a stop flag is raised, which unblocks
                // the other consumers anyway.
                let _ = queue.put(Entry::Done);
                debug!(consumer, processed = result.processed, "marker received, re-enqueued");
                result.exit = ExitReason::Done;
                break;
            }
            Err(Interrupted::Cancelled) => {
                result.exit = ExitReason::Cancelled;
                break;
            }
            Err(Interrupted::Aborted) => {
                result.exit = ExitReason::Aborted;
                break;
            }
        }
    }

    result.elapsed = start.elapsed();
    result
}
