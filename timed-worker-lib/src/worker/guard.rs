//! Completion guard for the worker routine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Publishes `done` when the worker routine unwinds or returns.
///
/// This is the only writer of the flag. The release store pairs with the
/// owner's acquire load, so a `true` read means the thread is about to exit.
pub(super) struct DoneGuard {
    done: Arc<AtomicBool>,
}

impl DoneGuard {
    pub(super) fn new(done: Arc<AtomicBool>) -> Self {
        Self { done }
    }
}

impl Drop for DoneGuard {
    fn drop(&mut self) {
        self.done.store(true, Ordering::Release);
    }
}
