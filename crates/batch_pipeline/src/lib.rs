pub mod error;
pub mod pipeline;

pub use error::{ErrorRecord, PipelineError};
pub use pipeline::{
    current_consumer_id, CancellationToken, ConsumerResult, ExitReason, Pipeline, PipelineConfig,
    PipelineConfigBuilder, PipelineReport, WorkSource, CONSUMER_ID,
};
