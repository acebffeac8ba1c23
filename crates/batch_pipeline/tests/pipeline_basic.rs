//! Basic pipeline tests on the happy path.
//!
//! Tests cover:
//! - Item conservation across consumer counts
//! - FIFO ordering with a single consumer
//! - Empty input handling
//! - Configuration validation
//! - Report shape and per-consumer attribution
//! - Pipeline reuse across runs

mod common;
use common::init_tracing;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use batch_pipeline::{
    current_consumer_id, ExitReason, Pipeline, PipelineConfig, PipelineError,
};

// ================================================================================================
// 1. Conservation and Ordering
// ================================================================================================
#[test]
fn test_single_consumer_preserves_fifo_order() -> Result<()> {
    init_tracing();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);

    let config = PipelineConfig::builder()
        .queue_capacity(4)
        .consumer_count(1)
        .build();
    let pipeline = Pipeline::new(config, move |n: u64| {
        seen_clone.lock().unwrap().push(n);
        Ok(n)
    })?;

    let report = pipeline.run((0..20).collect())?;

    assert_eq!(report.total_processed, 20);
    assert_eq!(*seen.lock().unwrap(), (0..20).collect::<Vec<u64>>());
    assert_eq!(report.per_consumer[0].sequences, (0..20).collect::<Vec<u64>>());
    Ok(())
}

#[test]
fn test_every_item_processed_exactly_once() -> Result<()> {
    init_tracing();

    let config = PipelineConfig::builder()
        .queue_capacity(4)
        .consumer_count(4)
        .build();
    let pipeline = Pipeline::new(config, |n: u64| Ok(n))?;

    let report = pipeline.run((0..50).collect())?;

    assert_eq!(report.total_processed, 50);
    assert_eq!(report.per_consumer.len(), 4);

    // Sequence sets are disjoint and cover 0..50 exactly.
    let mut all: Vec<u64> = report
        .per_consumer
        .iter()
        .flat_map(|r| r.sequences.iter().copied())
        .collect();
    all.sort_unstable();
    assert_eq!(all, (0..50).collect::<Vec<u64>>());
    Ok(())
}

#[test]
fn test_consumer_attribution_via_thread_local() -> Result<()> {
    init_tracing();

    let by_consumer: Arc<Mutex<HashMap<usize, Vec<i32>>>> = Arc::new(Mutex::new(HashMap::new()));
    let by_consumer_clone = Arc::clone(&by_consumer);

    let config = PipelineConfig::builder()
        .queue_capacity(2)
        .consumer_count(3)
        .build();
    let pipeline = Pipeline::new(config, move |n: i32| {
        by_consumer_clone
            .lock()
            .unwrap()
            .entry(current_consumer_id())
            .or_default()
            .push(n);
        Ok(n * 2)
    })?;

    let report = pipeline.run(vec![1, 2, 3, 4, 5])?;
    assert_eq!(report.total_processed, 5);

    // The thread-local tally matches the per-consumer report counts.
    let by_consumer = by_consumer.lock().unwrap();
    let total: usize = by_consumer.values().map(Vec::len).sum();
    assert_eq!(total, 5);
    for result in &report.per_consumer {
        let claimed = by_consumer.get(&result.consumer).map_or(0, Vec::len);
        assert_eq!(
            claimed, result.processed,
            "consumer {} tally mismatch",
            result.consumer
        );
    }
    Ok(())
}

// ================================================================================================
// 2. Empty Input and Termination
// ================================================================================================
#[test]
fn test_empty_input_terminates_all_consumers() -> Result<()> {
    init_tracing();

    let config = PipelineConfig::builder().consumer_count(4).build();
    let pipeline = Pipeline::new(config, |n: u64| Ok(n))?;

    let report = pipeline.run(Vec::new())?;

    assert_eq!(report.total_processed, 0);
    assert_eq!(report.per_consumer.len(), 4);
    for result in &report.per_consumer {
        assert_eq!(result.processed, 0);
        assert_eq!(result.exit, ExitReason::Done);
    }
    Ok(())
}

#[test]
fn test_pipeline_is_reusable_across_runs() -> Result<()> {
    init_tracing();

    let config = PipelineConfig::builder().consumer_count(2).build();
    let pipeline = Pipeline::new(config, |n: u64| Ok(n + 1))?;

    let first = pipeline.run((0..10).collect())?;
    let second = pipeline.run((0..25).collect())?;

    assert_eq!(first.total_processed, 10);
    assert_eq!(second.total_processed, 25);
    Ok(())
}

// ================================================================================================
// 3. Configuration Validation
// ================================================================================================
#[test]
fn test_rejects_zero_queue_capacity() {
    let config = PipelineConfig::builder().queue_capacity(0).build();
    let result = Pipeline::new(config, |n: u64| anyhow::Ok(n));
    match result {
        Err(PipelineError::Config { reason }) => {
            assert!(reason.contains("queue_capacity"), "unexpected reason: {reason}");
        }
        _ => panic!("expected Config error"),
    }
}

#[test]
fn test_rejects_zero_consumer_count() {
    let config = PipelineConfig::builder().consumer_count(0).build();
    let result = Pipeline::new(config, |n: u64| anyhow::Ok(n));
    match result {
        Err(PipelineError::Config { reason }) => {
            assert!(reason.contains("consumer_count"), "unexpected reason: {reason}");
        }
        _ => panic!("expected Config error"),
    }
}

// ================================================================================================
// 4. Report Shape
// ================================================================================================
#[test]
fn test_report_orders_consumers_and_tracks_elapsed() -> Result<()> {
    init_tracing();

    let config = PipelineConfig::builder().consumer_count(3).build();
    let pipeline = Pipeline::new(config, |n: u64| Ok(n))?;

    let report = pipeline.run((0..30).collect())?;

    let indices: Vec<usize> = report.per_consumer.iter().map(|r| r.consumer).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    for result in &report.per_consumer {
        assert!(result.elapsed > std::time::Duration::ZERO);
    }
    assert!(report.errors.is_empty());
    Ok(())
}
