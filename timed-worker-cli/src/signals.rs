//! SIGINT handling for the demo runner.
//!
//! The handler only raises the worker's emergency flag, so a Ctrl-C makes the
//! pending teardown give up immediately instead of waiting out the timeout.

use std::sync::OnceLock;

use timed_worker::EmergencyStop;

static EMERGENCY: OnceLock<EmergencyStop> = OnceLock::new();

#[cfg(unix)]
extern "C" fn on_interrupt(_signal: libc::c_int) {
    // `OnceLock::get` is a plain atomic load and `trigger` a relaxed store.
    if let Some(emergency) = EMERGENCY.get() {
        emergency.trigger();
    }
}

/// Route SIGINT to `emergency`. Only the first registration takes effect.
pub fn install(emergency: EmergencyStop) {
    if EMERGENCY.set(emergency).is_err() {
        log::debug!("interrupt handler already bound to a worker");
        return;
    }

    #[cfg(unix)]
    {
        let handler = on_interrupt as extern "C" fn(libc::c_int);
        let previous = unsafe { libc::signal(libc::SIGINT, handler as libc::sighandler_t) };
        if previous == libc::SIG_ERR {
            log::warn!("failed to install SIGINT handler");
        }
    }
    #[cfg(not(unix))]
    log::debug!("emergency stop on interrupt is only wired up on unix");
}
