//! src/pipeline/cancel.rs
//!
//! Cooperative cancellation flag shared between a caller and a running
//! pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation flag.
///
/// Clones share the same underlying flag. Cancelling is one-way and sticky:
/// once set, the flag stays set for the lifetime of the token. Producer and
/// consumer loops observe it within one poll interval even while blocked on
/// a full or empty queue.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
