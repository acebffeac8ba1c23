//! src/pipeline/config.rs
//!
//! Configuration for pipeline runs.
//!
//! `PipelineConfig` captures the knobs that shape a run: queue capacity
//! (backpressure), consumer count (parallelism), fail-fast (error policy),
//! and poll interval (shutdown responsiveness). Use the builder for
//! anything beyond the defaults:
//!
//! ```ignore
//! let config = PipelineConfig::builder()
//!     .queue_capacity(16)
//!     .consumer_count(4)
//!     .fail_fast(true)
//!     .build();
//! ```

use std::time::Duration;

use crate::error::PipelineError;

/// Tuning parameters for a pipeline.
///
/// Validated by `Pipeline::new`; a zero capacity or zero consumer count is
/// rejected before any thread is spawned.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum number of entries the work queue holds at once.
    ///
    /// Bounds the memory between producer and consumers. The producer
    /// blocks once the queue is full, so slow consumers throttle item
    /// generation instead of letting it run ahead unbounded.
    pub queue_capacity: usize,

    /// Number of consumer threads draining the queue.
    pub consumer_count: usize,

    /// Abort the whole run on the first item processing failure.
    ///
    /// When false (the default), item failures are recorded in the report
    /// and the run continues with the remaining items.
    pub fail_fast: bool,

    /// How often blocked queue operations re-check the cancellation and
    /// abort flags.
    ///
    /// Trade-off:
    /// - Too low: more responsive shutdown, higher idle CPU usage
    /// - Too high: cheaper idle waits, slower reaction to cancellation
    ///
    /// Default: 100ms, a good balance for most workloads.
    pub poll_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 8,
            consumer_count: 1,
            fail_fast: false,
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    pub(crate) fn validate(&self) -> Result<(), PipelineError> {
        if self.queue_capacity == 0 {
            return Err(PipelineError::config(
                "queue_capacity must be > 0; a zero-capacity queue can never \
                accept an entry and the pipeline cannot make progress",
            ));
        }
        if self.consumer_count == 0 {
            return Err(PipelineError::config(
                "consumer_count must be > 0; with no consumers enqueued items \
                are never drained",
            ));
        }
        Ok(())
    }
}

/// Builder for `PipelineConfig`.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Sets the bounded queue capacity (default: 8).
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Sets the number of consumer threads (default: 1).
    pub fn consumer_count(mut self, count: usize) -> Self {
        self.config.consumer_count = count;
        self
    }

    /// Aborts the run on the first item failure (default: false).
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.config.fail_fast = fail_fast;
        self
    }

    /// Sets the flag re-check interval for blocked queue operations
    /// (default: 100ms).
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Returns the configuration. Validation happens in `Pipeline::new`.
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}
