//! src/pipeline/coordinator.rs
//!
//! Pipeline coordinator: owns the configuration and processor, spawns the
//! producer and consumer threads for each run, joins them, drains the
//! leftover marker, and maps the collected results to a report or error.

use std::marker::PhantomData;
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Result};
use tracing::{debug, info, warn};

use crate::error::PipelineError;
use crate::pipeline::cancel::CancellationToken;
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::consumer::run_consumer;
use crate::pipeline::producer::{run_producer, run_source_producer, ProducerOutcome, WorkSource};
use crate::pipeline::queue::{Entry, WorkQueue};
use crate::pipeline::report::{ConsumerResult, PipelineReport};

/// Bounded producer/consumer pipeline.
///
/// Construction validates the configuration; each `run*` call spawns a
/// fresh producer thread and consumer pool, so one `Pipeline` value can be
/// reused across runs. The processor is shared by all consumers and must
/// therefore be `Sync`.
pub struct Pipeline<T, R, F> {
    config: PipelineConfig,
    processor: Arc<F>,
    _io: PhantomData<fn(T) -> R>,
}

impl<T, R, F> Pipeline<T, R, F>
where
    T: Send + 'static,
    R: 'static,
    F: Fn(T) -> Result<R> + Send + Sync + 'static,
{
    /// Creates a pipeline with a validated configuration.
    pub fn new(config: PipelineConfig, processor: F) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            processor: Arc::new(processor),
            _io: PhantomData,
        })
    }

    /// Runs the pipeline over a fixed set of items.
    pub fn run(&self, items: Vec<T>) -> Result<PipelineReport, PipelineError> {
        self.run_with_token(items, &CancellationToken::new())
    }

    /// Runs the pipeline over a fixed set of items with external
    /// cancellation.
    pub fn run_with_token(
        &self,
        items: Vec<T>,
        token: &CancellationToken,
    ) -> Result<PipelineReport, PipelineError> {
        self.launch(token.clone(), move |queue| {
            run_producer(queue, items.into_iter().map(Ok))
        })
    }

    /// Runs the pipeline over a fallible item source.
    pub fn run_source(
        &self,
        source: impl WorkSource<T> + 'static,
    ) -> Result<PipelineReport, PipelineError> {
        self.run_source_with_token(source, &CancellationToken::new())
    }

    /// Runs the pipeline over a fallible item source with external
    /// cancellation.
    pub fn run_source_with_token(
        &self,
        source: impl WorkSource<T> + 'static,
        token: &CancellationToken,
    ) -> Result<PipelineReport, PipelineError> {
        self.launch(token.clone(), move |queue| {
            run_source_producer(queue, source)
        })
    }

    /// Spawns the threads for one run, joins them, and maps the outcome.
    fn launch<P>(
        &self,
        cancel: CancellationToken,
        produce: P,
    ) -> Result<PipelineReport, PipelineError>
    where
        P: FnOnce(&WorkQueue<T>) -> ProducerOutcome + Send + 'static,
    {
        let abort = CancellationToken::new();
        let queue = Arc::new(WorkQueue::new(
            self.config.queue_capacity,
            self.config.poll_interval,
            cancel.clone(),
            abort.clone(),
        ));

        info!(
            consumers = self.config.consumer_count,
            capacity = self.config.queue_capacity,
            fail_fast = self.config.fail_fast,
            "starting pipeline run"
        );

        let producer_queue = Arc::clone(&queue);
        let producer = thread::Builder::new()
            .name("pipeline-producer".to_string())
            .spawn(move || produce(&producer_queue))
            .map_err(|source| PipelineError::Spawn {
                thread: "pipeline-producer".to_string(),
                source,
            })?;

        let mut consumers = Vec::with_capacity(self.config.consumer_count);
        for consumer_id in 0..self.config.consumer_count {
            let queue = Arc::clone(&queue);
            let processor = Arc::clone(&self.processor);
            let fail_fast = self.config.fail_fast;

            let handle = thread::Builder::new()
                .name(format!("pipeline-consumer-{consumer_id}"))
                .spawn(move || run_consumer(consumer_id, &queue, processor.as_ref(), fail_fast));

            match handle {
                Ok(handle) => consumers.push(handle),
                Err(source) => {
                    // Unblock and reap the threads spawned so far before
                    // reporting the failure.
                    abort.cancel();
                    let _ = producer.join();
                    for handle in consumers {
                        let _ = handle.join();
                    }
                    return Err(PipelineError::Spawn {
                        thread: format!("pipeline-consumer-{consumer_id}"),
                        source,
                    });
                }
            }
        }

        let outcome = match producer.join() {
            Ok(outcome) => outcome,
            Err(_) => {
                // A panicked producer never enqueued the marker; do it here
                // so the consumers still terminate.
                let _ = queue.put(Entry::Done);
                ProducerOutcome {
                    enqueued: 0,
                    failure: Some(anyhow!("producer thread panicked")),
                }
            }
        };

        let mut results: Vec<ConsumerResult> = Vec::with_capacity(consumers.len());
        for (consumer_id, handle) in consumers.into_iter().enumerate() {
            match handle.join() {
                Ok(result) => results.push(result),
                Err(_) => {
                    warn!(consumer = consumer_id, "consumer thread panicked; its tally is lost");
                }
            }
        }

        // The last consumer to exit leaves one marker behind; a cancelled
        // or aborted run may also leave unprocessed items.
        let mut drained_markers = 0usize;
        let mut drained_items = 0usize;
        while let Some(entry) = queue.try_get() {
            match entry {
                Entry::Done => drained_markers += 1,
                Entry::Item(_) => drained_items += 1,
            }
        }
        debug!(drained_markers, drained_items, "queue drained after join");

        let report = PipelineReport::from_results(results);

        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled { report });
        }
        if let Some(source) = outcome.failure {
            return Err(PipelineError::Producer {
                enqueued: outcome.enqueued,
                report,
                source,
            });
        }
        if self.config.fail_fast {
            if let Some(first) = report.errors.first().cloned() {
                return Err(PipelineError::FailFast { first, report });
            }
        }

        info!(
            total_processed = report.total_processed,
            errors = report.errors.len(),
            "pipeline run complete"
        );
        Ok(report)
    }
}
