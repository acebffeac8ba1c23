//! src/pipeline/mod.rs
//!
//! This module implements the bounded producer/consumer `Pipeline`.
//!
//! The `Pipeline` moves items from a producer through a bounded FIFO work
//! queue to a pool of consumer threads, and shuts the pool down with a
//! broadcast marker: the producer enqueues a single `Done` entry after the
//! last item, and every consumer that dequeues it puts it back for its
//! peers before exiting.
//!
//! # Architecture Overview
//!
//! ```text
//!   Vec<T> / WorkSource<T>
//!            │ items, pulled lazily
//!            ↓
//!      ┌──────────┐
//!      │ Producer │  assigns sequence numbers, appends one Done marker
//!      └────┬─────┘
//!           │ blocks when full (backpressure)
//!           ↓
//!    ┌─────────────┐
//!    │  WorkQueue  │  bounded FIFO of Item(seq, payload) | Done
//!    └──────┬──────┘
//!           │ shared by all consumers
//!     ┌─────┼─────────────┐
//!     ↓     ↓             ↓
//!  ┌──────┐┌──────┐   ┌────────┐
//!  │ C #0 ││ C #1 │ … │ C #M-1 │  each re-enqueues Done, then exits
//!  └──┬───┘└──┬───┘   └───┬────┘
//!     │       │           │ per-consumer tallies at join time
//!     └───────┴─────┬─────┘
//!                   ↓
//!            ┌─────────────┐
//!            │ Coordinator │  joins, drains leftover marker, aggregates
//!            └──────┬──────┘
//!                   ↓
//!            PipelineReport
//! ```
//!
//! # Module Structure
//!
//! ```text
//! src/pipeline/
//! ├── mod.rs             # Public API exports + module-level architecture docs
//! ├── cancel.rs          # CancellationToken
//! ├── config.rs          # PipelineConfig, builder, and validation
//! ├── coordinator.rs     # Pipeline struct, run methods, outcome mapping
//! ├── producer.rs        # Producer loop and the WorkSource trait
//! ├── consumer.rs        # Consumer loop and marker propagation
//! ├── queue.rs           # Bounded WorkQueue with flag-aware blocking ops
//! ├── report.rs          # ConsumerResult, ExitReason, PipelineReport
//! └── common/
//!     ├── mod.rs         # Module declarations for shared utilities
//!     └── thread.rs      # Thread-local consumer ID
//! ```
//!
//! # Example Usage
//!
//! ## Basic run over a vector:
//! ```ignore
//! let config = PipelineConfig::builder()
//!     .queue_capacity(8)
//!     .consumer_count(4)
//!     .build();
//!
//! let pipeline = Pipeline::new(config, |n: u64| Ok(n * 2))?;
//! let report = pipeline.run((0..100).collect())?;
//! assert_eq!(report.total_processed, 100);
//! ```
//!
//! ## Cancellable run over a fallible source:
//! ```ignore
//! let token = CancellationToken::new();
//! let handle = {
//!     let token = token.clone();
//!     std::thread::spawn(move || pipeline.run_source_with_token(source, &token))
//! };
//! // ... later, from any thread:
//! token.cancel();
//! ```
//!
//! # Tuning Notes
//!
//! - `queue_capacity` bounds producer run-ahead; at most capacity + M
//!   items are unprocessed at any instant
//! - `consumer_count` sets parallelism; items are distributed by
//!   availability, not round-robin
//! - `fail_fast = true` turns the first item failure into a run failure
//! - `poll_interval` bounds how long any thread stays blocked after a
//!   cancellation or abort

// Module declarations
mod cancel;
mod common;
mod config;
mod consumer;
mod coordinator;
mod producer;
mod queue;
mod report;

// Public re-exports
pub use cancel::CancellationToken;
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use coordinator::Pipeline;
pub use producer::WorkSource;
pub use report::{ConsumerResult, ExitReason, PipelineReport};

pub use common::thread::{current_consumer_id, CONSUMER_ID};
