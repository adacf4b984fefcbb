//! Bounded joiner used by teardown.
//!
//! `JoinHandle::join` cannot be given a deadline, so the join runs on a
//! throwaway thread and the owner waits on a channel instead.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

const JOINER_THREAD_NAME: &str = "timed-worker-joiner";

/// Result of waiting on a bounded join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum JoinOutcome {
    /// The worker thread was joined before the deadline.
    Joined,
    /// The deadline passed; the joiner keeps running unsupervised.
    TimedOut,
    /// No joiner thread could be spawned; the worker handle was dropped.
    SpawnFailed,
}

/// Hand `handle` to a joiner thread and wait for it until `wait_until`.
///
/// Ownership of the worker thread leaves the caller here whatever the outcome.
pub(super) fn join_until(handle: JoinHandle<()>, wait_until: Instant) -> JoinOutcome {
    let (done_tx, done_rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name(JOINER_THREAD_NAME.to_string())
        .spawn(move || {
            if handle.join().is_err() {
                log::warn!("worker thread panicked outside its failure boundary");
            }
            // The owner may have stopped listening already.
            let _ = done_tx.send(());
        });

    if let Err(err) = spawned {
        log::warn!("failed to spawn joiner thread: {}", err);
        return JoinOutcome::SpawnFailed;
    }

    let remaining = wait_until.saturating_duration_since(Instant::now());
    match done_rx.recv_timeout(remaining) {
        Ok(()) => JoinOutcome::Joined,
        // The sender only drops without sending once the join has returned.
        Err(RecvTimeoutError::Disconnected) => JoinOutcome::Joined,
        Err(RecvTimeoutError::Timeout) => JoinOutcome::TimedOut,
    }
}
