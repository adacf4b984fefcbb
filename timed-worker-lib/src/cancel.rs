//! Cooperative cancellation shared between a worker and its owner.
//!
//! One [`StopSource`] carries two independent signals:
//! - the cooperative stop flag, which the worker polls through its
//!   [`StopToken`] and which fires registered [`StopCallback`]s;
//! - the emergency flag, which only collapses the owner's teardown window and
//!   is raised with a single relaxed store so it can be set from a signal
//!   handler (see [`EmergencyStop`]).

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Callback = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct CallbackRegistry {
    next_id: u64,
    entries: Vec<(u64, Callback)>,
}

#[derive(Default)]
struct StopState {
    stop: AtomicBool,
    emergency: AtomicBool,
    callbacks: Mutex<CallbackRegistry>,
}

impl StopState {
    fn registry(&self) -> MutexGuard<'_, CallbackRegistry> {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn request_stop(&self) -> bool {
        if self.stop.swap(true, Ordering::AcqRel) {
            return false;
        }

        // Run callbacks outside the lock so they may touch the token freely.
        let callbacks = std::mem::take(&mut self.registry().entries);
        for (_, callback) in callbacks {
            run_callback(callback);
        }
        true
    }
}

fn run_callback(callback: Callback) {
    if panic::catch_unwind(AssertUnwindSafe(callback)).is_err() {
        log::warn!("stop callback panicked; continuing stop request");
    }
}

/// Owner side of the cancellation object.
///
/// Cloning shares the underlying state.
#[derive(Clone, Default)]
pub struct StopSource {
    state: Arc<StopState>,
}

impl StopSource {
    /// Create a source with neither stop nor emergency requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Worker-facing token observing this source.
    pub fn token(&self) -> StopToken {
        StopToken {
            state: self.state.clone(),
        }
    }

    /// Standalone handle that can only raise the emergency flag.
    pub fn emergency_handle(&self) -> EmergencyStop {
        EmergencyStop {
            state: self.state.clone(),
        }
    }

    /// Request a cooperative stop.
    ///
    /// Returns `true` if this call performed the transition. Registered
    /// callbacks run on the calling thread before this returns.
    pub fn request_stop(&self) -> bool {
        self.state.request_stop()
    }

    /// Raise the emergency flag. Performs a single relaxed store.
    pub fn emergency_stop(&self) {
        self.state.emergency.store(true, Ordering::Relaxed);
    }

    pub fn stop_requested(&self) -> bool {
        self.state.stop.load(Ordering::Acquire)
    }

    pub fn escalated(&self) -> bool {
        self.state.emergency.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for StopSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopSource")
            .field("stop_requested", &self.stop_requested())
            .field("escalated", &self.escalated())
            .finish()
    }
}

/// Worker side of the cancellation object, handed to the work function.
#[derive(Clone)]
pub struct StopToken {
    state: Arc<StopState>,
}

impl StopToken {
    /// Whether a cooperative stop has been requested.
    pub fn stop_requested(&self) -> bool {
        self.state.stop.load(Ordering::Acquire)
    }

    /// Whether the owner escalated to an emergency stop.
    pub fn escalated(&self) -> bool {
        self.state.emergency.load(Ordering::Relaxed)
    }

    /// Register `callback` to run once when stop is requested.
    ///
    /// If stop was already requested the callback runs immediately on the
    /// current thread. Dropping the returned guard deregisters a callback
    /// that has not fired yet; it does not wait for one that is running.
    pub fn on_stop<F>(&self, callback: F) -> StopCallback
    where
        F: FnOnce() + Send + 'static,
    {
        let mut registry = self.state.registry();
        if self.state.stop.load(Ordering::Acquire) {
            drop(registry);
            run_callback(Box::new(callback));
            return StopCallback {
                state: self.state.clone(),
                id: None,
            };
        }

        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push((id, Box::new(callback)));
        StopCallback {
            state: self.state.clone(),
            id: Some(id),
        }
    }
}

impl std::fmt::Debug for StopToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopToken")
            .field("stop_requested", &self.stop_requested())
            .field("escalated", &self.escalated())
            .finish()
    }
}

/// Registration guard returned by [`StopToken::on_stop`].
#[must_use = "dropping the guard deregisters the callback"]
pub struct StopCallback {
    state: Arc<StopState>,
    id: Option<u64>,
}

impl Drop for StopCallback {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.state
                .registry()
                .entries
                .retain(|(entry_id, _)| *entry_id != id);
        }
    }
}

/// Raises the emergency flag and nothing else.
///
/// `trigger` does one relaxed atomic store: no allocation, no locking, no
/// logging. Keep a clone in a `static` to call it from a signal handler.
#[derive(Clone)]
pub struct EmergencyStop {
    state: Arc<StopState>,
}

impl EmergencyStop {
    pub fn trigger(&self) {
        self.state.emergency.store(true, Ordering::Relaxed);
    }
}
