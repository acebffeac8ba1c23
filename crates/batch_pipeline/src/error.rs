//! src/error.rs
//!
//! Error taxonomy for pipeline construction and execution.
//!
//! Run-level failures (`PipelineError`) abort or reject a run and carry the
//! partial `PipelineReport` collected before the failure, so callers can
//! inspect what completed. Per-item processing failures are data, not
//! control flow: they are captured as `ErrorRecord` values inside the
//! report and never cross the pipeline as errors on their own.

use thiserror::Error;

use crate::pipeline::PipelineReport;

/// A single item that failed processing on a consumer.
///
/// Recorded by the consumer that observed the failure and surfaced through
/// `PipelineReport::errors` (and `ConsumerResult::errors`).
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    /// Index of the consumer that processed the item.
    pub consumer: usize,
    /// Sequence number the producer assigned to the item.
    pub seq: u64,
    /// Rendered error message, including the source chain.
    pub message: String,
}

impl std::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "item {} failed on consumer {}: {}",
            self.seq, self.consumer, self.message
        )
    }
}

/// Errors returned by pipeline construction and runs.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Rejected configuration. Raised at construction time, never mid-run.
    #[error("invalid pipeline configuration: {reason}")]
    Config { reason: String },

    /// An OS thread for the pipeline could not be spawned.
    #[error("failed to spawn {thread} thread")]
    Spawn {
        thread: String,
        #[source]
        source: std::io::Error,
    },

    /// The producer failed to generate an item or open its source.
    ///
    /// Items enqueued before the failure were still processed; their
    /// tallies are in `report`.
    #[error("producer failed after enqueueing {enqueued} items")]
    Producer {
        enqueued: usize,
        report: PipelineReport,
        #[source]
        source: anyhow::Error,
    },

    /// Fail-fast mode stopped the run on the first item failure.
    #[error("pipeline aborted on first item failure: {first}")]
    FailFast {
        first: ErrorRecord,
        report: PipelineReport,
    },

    /// The run was cancelled through its `CancellationToken`.
    #[error("pipeline run cancelled")]
    Cancelled { report: PipelineReport },
}

impl PipelineError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        PipelineError::Config {
            reason: reason.into(),
        }
    }

    /// The partial report collected before the failure, if the run got far
    /// enough to produce one.
    pub fn report(&self) -> Option<&PipelineReport> {
        match self {
            PipelineError::Producer { report, .. }
            | PipelineError::FailFast { report, .. }
            | PipelineError::Cancelled { report } => Some(report),
            PipelineError::Config { .. } | PipelineError::Spawn { .. } => None,
        }
    }
}
