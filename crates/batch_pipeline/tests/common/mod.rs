use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use anyhow::Result;
use batch_pipeline::WorkSource;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs the test tracing subscriber once per binary. Honors RUST_LOG.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Source that yields a range of numbers and counts how many items have
/// been pulled from the stream so far.
pub struct CountingSource {
    pub count: u64,
    pub pulled: Arc<AtomicUsize>,
}

impl WorkSource<u64> for CountingSource {
    fn stream(&self) -> Result<Box<dyn Iterator<Item = Result<u64>> + Send>> {
        let pulled = Arc::clone(&self.pulled);
        Ok(Box::new((0..self.count).map(move |n| {
            pulled.fetch_add(1, Ordering::SeqCst);
            Ok(n)
        })))
    }
}

/// Source whose stream fails at a fixed position.
pub struct FailingSource {
    pub ok_before_failure: u64,
}

impl WorkSource<u64> for FailingSource {
    fn stream(&self) -> Result<Box<dyn Iterator<Item = Result<u64>> + Send>> {
        let limit = self.ok_before_failure;
        Ok(Box::new((0..=limit).map(move |n| {
            if n < limit {
                Ok(n)
            } else {
                Err(anyhow::anyhow!("source exhausted at item {n}"))
            }
        })))
    }
}

/// Source that fails to open its stream.
pub struct UnopenableSource;

impl WorkSource<u64> for UnopenableSource {
    fn stream(&self) -> Result<Box<dyn Iterator<Item = Result<u64>> + Send>> {
        Err(anyhow::anyhow!("backing store unavailable"))
    }
}

/// Processor gate: holds consumers inside the processor until released.
pub struct Gate {
    open: Arc<AtomicBool>,
}

impl Gate {
    pub fn closed() -> Self {
        Self {
            open: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn release(&self) {
        self.open.store(true, Ordering::SeqCst);
    }

    /// Returns a processor that blocks until the gate opens, then counts.
    pub fn processor(&self, processed: Arc<AtomicUsize>) -> impl Fn(u64) -> Result<u64> {
        let open = Arc::clone(&self.open);
        move |n| {
            while !open.load(Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(5));
            }
            processed.fetch_add(1, Ordering::SeqCst);
            Ok(n)
        }
    }
}
