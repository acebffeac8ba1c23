//! Thread-local consumer identity.
//!
//! Each consumer thread stores its index here before entering its loop, so
//! processor closures can attribute work to the consumer running them
//! without threading an index through every call.

use std::cell::RefCell;

thread_local! {
    /// Index of the consumer running on this thread. 0 outside consumer
    /// threads.
    pub static CONSUMER_ID: RefCell<usize> = RefCell::new(0);
}

/// Returns the consumer index of the current thread.
pub fn current_consumer_id() -> usize {
    CONSUMER_ID.with(|id| *id.borrow())
}
