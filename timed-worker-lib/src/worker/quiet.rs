//! Panic reporting for worker threads.
//!
//! The default panic hook prints to stderr before `catch_unwind` sees the
//! payload. Inside the failure boundary the sink is the only place a failure
//! goes, so a process-wide hook skips the chained hook while the current
//! thread is marked quiet.

use std::cell::Cell;
use std::panic;
use std::sync::Once;

thread_local! {
    static QUIET: Cell<bool> = const { Cell::new(false) };
}

static INSTALL_HOOK: Once = Once::new();

/// Wrap the current panic hook once per process. Panics on threads outside a
/// [`QuietPanics`] scope still reach the previous hook.
pub(super) fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !is_quiet() {
                previous(info);
            }
        }));
    });
}

pub(super) fn is_quiet() -> bool {
    QUIET.with(Cell::get)
}

/// Marks the current thread quiet until dropped.
pub(super) struct QuietPanics {
    previous: bool,
}

impl QuietPanics {
    pub(super) fn enter() -> Self {
        Self {
            previous: QUIET.with(|quiet| quiet.replace(true)),
        }
    }
}

impl Drop for QuietPanics {
    fn drop(&mut self) {
        QUIET.with(|quiet| quiet.set(self.previous));
    }
}
