//! Body of the worker thread: subscription, failure boundary, completion.

use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::cancel::{EmergencyStop, StopCallback, StopToken};
use crate::settings::{StartPolicy, StopEscalation};
use crate::sink::{emit, LogSink};

use super::guard::DoneGuard;
use super::quiet::QuietPanics;
use super::LOG_PREFIX;

/// Return types accepted from a work function.
///
/// `()` never fails. `Result<(), E>` reports `Err(e)` through the sink as an
/// unhandled exception described by `e`'s `Display` output.
pub trait WorkResult {
    /// Description of the failure, if the work failed.
    fn into_failure(self) -> Option<String>;
}

impl WorkResult for () {
    fn into_failure(self) -> Option<String> {
        None
    }
}

impl<E: Display> WorkResult for Result<(), E> {
    fn into_failure(self) -> Option<String> {
        self.err().map(|err| err.to_string())
    }
}

/// State captured at spawn time and moved onto the worker thread.
pub(super) struct RoutineContext {
    pub(super) token: StopToken,
    pub(super) emergency: EmergencyStop,
    pub(super) done: Arc<AtomicBool>,
    pub(super) sink: Arc<dyn LogSink>,
    pub(super) start_policy: StartPolicy,
    pub(super) escalation: StopEscalation,
}

/// Run `work` on the current thread inside the failure boundary.
pub(super) fn run_worker_routine<F, R>(ctx: RoutineContext, work: F)
where
    F: FnOnce(StopToken) -> R,
    R: WorkResult,
{
    // Dropped last: `done` is published after the subscription is gone.
    let _done = DoneGuard::new(ctx.done.clone());
    let _subscription = subscribe(&ctx);

    if ctx.start_policy == StartPolicy::SkipIfStopped && ctx.token.stop_requested() {
        log::debug!("stop requested before start; skipping work");
        return;
    }

    let token = ctx.token.clone();
    let quiet = QuietPanics::enter();
    let outcome = panic::catch_unwind(AssertUnwindSafe(move || work(token).into_failure()));
    drop(quiet);
    match outcome {
        Ok(None) => log::trace!("work finished"),
        Ok(Some(description)) => report_unhandled(&*ctx.sink, &description),
        Err(payload) => match panic_description(payload.as_ref()) {
            Some(description) => report_unhandled(&*ctx.sink, description),
            None => emit(&*ctx.sink, &format!("{} unknown exception", LOG_PREFIX)),
        },
    }
}

fn subscribe(ctx: &RoutineContext) -> StopCallback {
    match ctx.escalation {
        StopEscalation::Escalate => {
            let emergency = ctx.emergency.clone();
            ctx.token.on_stop(move || emergency.trigger())
        }
        StopEscalation::Cooperative => ctx.token.on_stop(|| log::debug!("worker stop requested")),
    }
}

fn report_unhandled(sink: &dyn LogSink, description: &str) {
    emit(
        sink,
        &format!("{} unhandled exception: {}", LOG_PREFIX, description),
    );
}

fn panic_description(payload: &(dyn Any + Send)) -> Option<&str> {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        Some(*message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        Some(message.as_str())
    } else {
        None
    }
}
