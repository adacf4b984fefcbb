//! Owner handle for a single bounded-lifetime worker thread.
//!
//! The worker internals are split so responsibilities are explicit:
//! - [`routine`] wraps the work function on the worker thread.
//! - [`guard`] publishes completion when the routine exits.
//! - [`joiner`] performs the unbounded join off to the side at teardown.
//! - [`quiet`] keeps the panic hook from printing failures the routine reports.

mod guard;
mod joiner;
mod quiet;
mod routine;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::cancel::{EmergencyStop, StopSource, StopToken};
use crate::settings::{StartPolicy, StopEscalation, WorkerSettings};
use crate::sink::{emit, LogSink, StderrSink};
use crate::TimedWorkerError;

pub use routine::WorkResult;

use joiner::JoinOutcome;
use routine::{run_worker_routine, RoutineContext};

pub(crate) const LOG_PREFIX: &str = "[TimedWorker]";
const DEFAULT_THREAD_NAME: &str = "timed-worker";
/// Stand-in for "never" when `now + timeout` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

fn deadline_after(now: Instant, timeout: Duration) -> Instant {
    now.checked_add(timeout)
        .unwrap_or_else(|| now + FAR_FUTURE)
}

/// How a teardown ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    /// No thread was owned: already torn down, or never started.
    Inert,
    /// The worker thread was joined.
    Joined,
    /// The worker did not finish in time and was abandoned.
    Detached,
}

impl Teardown {
    pub fn is_joined(self) -> bool {
        self == Self::Joined
    }

    pub fn is_detached(self) -> bool {
        self == Self::Detached
    }
}

/// Configures and starts a [`TimedWorker`].
pub struct Builder {
    settings: WorkerSettings,
    sink: Option<Arc<dyn LogSink>>,
    stop: Option<StopSource>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::from_settings(WorkerSettings::default())
    }
}

impl Builder {
    /// Builder with the given grace period and default policies.
    pub fn new(timeout: Duration) -> Self {
        Self::from_settings(WorkerSettings::new(timeout))
    }

    pub fn from_settings(settings: WorkerSettings) -> Self {
        Self {
            settings,
            sink: None,
            stop: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout_ms = WorkerSettings::new(timeout).timeout_ms;
        self
    }

    /// Sink for exception and abandonment messages. Defaults to stderr.
    pub fn sink<S: LogSink + 'static>(self, sink: S) -> Self {
        self.shared_sink(Arc::new(sink))
    }

    pub fn shared_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn start_policy(mut self, policy: StartPolicy) -> Self {
        self.settings.start_policy = policy;
        self
    }

    pub fn escalation(mut self, escalation: StopEscalation) -> Self {
        self.settings.escalation = escalation;
        self
    }

    /// Name for the worker thread.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.settings.thread_name = Some(name.into());
        self
    }

    /// Observe an externally owned stop source instead of a fresh one.
    pub fn stop_source(mut self, stop: StopSource) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Start `work` on a new thread.
    ///
    /// If the thread cannot be spawned the failure is written to the sink and
    /// an inert handle is returned; its teardown is a no-op.
    pub fn spawn<F, R>(self, work: F) -> TimedWorker
    where
        F: FnOnce(StopToken) -> R + Send + 'static,
        R: WorkResult,
    {
        let (worker, spawned) = self.launch(work);
        if let Err(err) = spawned {
            log::error!("failed to spawn worker thread {}: {}", worker.name, err);
            emit(
                &*worker.sink,
                &format!("{} failed to spawn worker thread: {}", LOG_PREFIX, err),
            );
        }
        worker
    }

    /// Start `work` with `args` bound once and passed after the token.
    pub fn spawn_with<F, A, R>(self, work: F, args: A) -> TimedWorker
    where
        F: FnOnce(StopToken, A) -> R + Send + 'static,
        A: Send + 'static,
        R: WorkResult,
    {
        self.spawn(move |token| work(token, args))
    }

    /// Start `work`, reporting a thread spawn failure to the caller.
    ///
    /// # Errors
    /// Returns [`TimedWorkerError::Spawn`] if the OS refuses the thread.
    pub fn try_spawn<F, R>(self, work: F) -> Result<TimedWorker, TimedWorkerError>
    where
        F: FnOnce(StopToken) -> R + Send + 'static,
        R: WorkResult,
    {
        let (worker, spawned) = self.launch(work);
        spawned.map_err(TimedWorkerError::Spawn)?;
        Ok(worker)
    }

    fn launch<F, R>(self, work: F) -> (TimedWorker, std::io::Result<()>)
    where
        F: FnOnce(StopToken) -> R + Send + 'static,
        R: WorkResult,
    {
        let timeout = self.settings.timeout();
        let stop = self.stop.unwrap_or_default();
        let sink = self.sink.unwrap_or_else(|| Arc::new(StderrSink));
        let done = Arc::new(AtomicBool::new(false));
        let name = self
            .settings
            .thread_name
            .unwrap_or_else(|| DEFAULT_THREAD_NAME.to_string());

        let context = RoutineContext {
            token: stop.token(),
            emergency: stop.emergency_handle(),
            done: done.clone(),
            sink: sink.clone(),
            start_policy: self.settings.start_policy,
            escalation: self.settings.escalation,
        };

        quiet::install_hook();
        let deadline = deadline_after(Instant::now(), timeout);
        let spawned = thread::Builder::new()
            .name(name.clone())
            .spawn(move || run_worker_routine(context, work));

        let (thread, result) = match spawned {
            Ok(handle) => {
                log::debug!("spawned worker {} with timeout {:?}", name, timeout);
                (Some(handle), Ok(()))
            }
            Err(err) => (None, Err(err)),
        };

        let worker = TimedWorker {
            timeout,
            deadline,
            thread,
            stop,
            done,
            detached: false,
            sink,
            name,
        };
        (worker, result)
    }
}

/// A worker thread that is joined within its deadline or abandoned.
///
/// Dropping the handle runs [`shutdown`](Self::shutdown) if it has not run
/// yet. The handle is move-only; exactly one owner ever tears the thread down.
///
/// The first worker spawned wraps the process panic hook. A panic inside the
/// work function is reported only through the sink; panics anywhere else go
/// to the previous hook unchanged.
///
/// `done()` stays `false` for a worker that is abandoned before it finishes,
/// and before teardown there is no way to tell such a worker apart from one
/// that is still on track.
pub struct TimedWorker {
    timeout: Duration,
    deadline: Instant,
    thread: Option<JoinHandle<()>>,
    stop: StopSource,
    done: Arc<AtomicBool>,
    detached: bool,
    sink: Arc<dyn LogSink>,
    name: String,
}

impl TimedWorker {
    /// Start `work` with the given grace period, logging to stderr.
    pub fn spawn<F, R>(timeout: Duration, work: F) -> Self
    where
        F: FnOnce(StopToken) -> R + Send + 'static,
        R: WorkResult,
    {
        Builder::new(timeout).spawn(work)
    }

    /// Start `work` with `args` bound once and passed after the token.
    pub fn spawn_with<F, A, R>(timeout: Duration, work: F, args: A) -> Self
    where
        F: FnOnce(StopToken, A) -> R + Send + 'static,
        A: Send + 'static,
        R: WorkResult,
    {
        Builder::new(timeout).spawn_with(work, args)
    }

    pub fn builder(timeout: Duration) -> Builder {
        Builder::new(timeout)
    }

    /// Ask the worker to stop. Never blocks; repeated calls are no-ops.
    pub fn request_stop(&self) {
        if self.stop.request_stop() {
            log::debug!("stop requested for worker {}", self.name);
        }
    }

    /// Collapse the next teardown's wait window to zero.
    ///
    /// Only performs a relaxed atomic store, so it is safe from restricted
    /// contexts. The worker thread itself is not touched.
    pub fn emergency_stop(&self) {
        self.stop.emergency_stop();
    }

    /// Detachable handle performing [`emergency_stop`](Self::emergency_stop).
    pub fn emergency_handle(&self) -> EmergencyStop {
        self.stop.emergency_handle()
    }

    /// Whether the worker routine has returned.
    pub fn done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Whether teardown abandoned the thread. Always `false` before teardown.
    pub fn detached(&self) -> bool {
        self.detached
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.stop_requested()
    }

    pub fn escalated(&self) -> bool {
        self.stop.escalated()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creation time plus timeout. Fixed for the life of the handle.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop the worker and wait for it until the deadline at most.
    ///
    /// Runs once per handle; later calls (and the eventual drop) return
    /// [`Teardown::Inert`].
    pub fn shutdown(&mut self) -> Teardown {
        let Some(handle) = self.thread.take() else {
            return Teardown::Inert;
        };

        if self.done() {
            if handle.join().is_err() {
                log::warn!("worker {} panicked outside its failure boundary", self.name);
            }
            log::debug!("joined finished worker {}", self.name);
            return Teardown::Joined;
        }

        let now = Instant::now();
        self.request_stop();
        let mut wait_until = deadline_after(now, self.timeout).min(self.deadline);
        if self.stop.escalated() {
            wait_until = now;
        }

        match joiner::join_until(handle, wait_until) {
            JoinOutcome::Joined => {
                log::debug!("joined worker {} after stop request", self.name);
                Teardown::Joined
            }
            JoinOutcome::TimedOut | JoinOutcome::SpawnFailed => {
                log::warn!("worker {} missed its deadline; detaching", self.name);
                emit(
                    &*self.sink,
                    &format!("{} FORCED detach - resources may leak", LOG_PREFIX),
                );
                self.detached = true;
                Teardown::Detached
            }
        }
    }
}

impl Drop for TimedWorker {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.shutdown();
        }
    }
}

impl std::fmt::Debug for TimedWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedWorker")
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .field("running", &self.thread.is_some())
            .field("done", &self.done())
            .field("detached", &self.detached)
            .field("stop", &self.stop)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MemorySink, WriterSink};
    use std::io;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;

    const FORCED: &str = "FORCED detach";

    fn wait_for(condition: impl Fn() -> bool, limit: Duration) -> bool {
        let started = Instant::now();
        while started.elapsed() < limit {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        condition()
    }

    fn stubborn(duration: Duration) -> impl FnOnce(StopToken) + Send + 'static {
        move |_token| thread::sleep(duration)
    }

    fn polite(tick: Duration) -> impl FnOnce(StopToken) + Send + 'static {
        move |token| {
            while !token.stop_requested() {
                thread::sleep(tick);
            }
        }
    }

    #[test]
    fn cooperative_worker_joins_within_timeout() {
        let sink = MemorySink::new();
        let mut worker = Builder::new(Duration::from_millis(500))
            .sink(sink.clone())
            .spawn(polite(Duration::from_millis(5)));

        thread::sleep(Duration::from_millis(20));
        worker.request_stop();
        let started = Instant::now();
        let outcome = worker.shutdown();

        assert_eq!(outcome, Teardown::Joined);
        assert!(started.elapsed() < Duration::from_millis(400));
        assert!(worker.done());
        assert!(!worker.detached());
        assert!(!sink.contains(FORCED));
    }

    #[test]
    fn teardown_stops_polite_worker_without_explicit_request() {
        let sink = MemorySink::new();
        let mut worker = Builder::new(Duration::from_secs(1))
            .sink(sink.clone())
            .spawn(polite(Duration::from_millis(5)));

        assert_eq!(worker.shutdown(), Teardown::Joined);
        assert!(worker.stop_requested());
        assert!(sink.is_empty());
    }

    #[test]
    fn stubborn_worker_is_detached_after_timeout() {
        let sink = MemorySink::new();
        let mut worker = Builder::new(Duration::from_millis(50))
            .sink(sink.clone())
            .spawn(stubborn(Duration::from_secs(1)));

        let started = Instant::now();
        let outcome = worker.shutdown();
        let elapsed = started.elapsed();

        assert_eq!(outcome, Teardown::Detached);
        assert!(elapsed >= Duration::from_millis(30));
        assert!(elapsed < Duration::from_millis(800));
        assert!(worker.detached());
        assert!(!worker.done());
        assert!(sink.contains("[TimedWorker] FORCED detach - resources may leak"));
    }

    #[test]
    fn late_teardown_still_honours_absolute_deadline() {
        let sink = MemorySink::new();
        let mut worker = Builder::new(Duration::from_millis(100))
            .sink(sink.clone())
            .spawn(stubborn(Duration::from_secs(1)));

        thread::sleep(Duration::from_millis(150));
        let started = Instant::now();
        let outcome = worker.shutdown();

        assert_eq!(outcome, Teardown::Detached);
        assert!(started.elapsed() < Duration::from_millis(60));
    }

    #[test]
    fn emergency_stop_collapses_wait_window() {
        let sink = MemorySink::new();
        let mut worker = Builder::new(Duration::from_secs(5))
            .sink(sink.clone())
            .spawn(stubborn(Duration::from_secs(1)));

        thread::sleep(Duration::from_millis(10));
        worker.emergency_stop();
        let started = Instant::now();
        let outcome = worker.shutdown();

        assert_eq!(outcome, Teardown::Detached);
        assert!(started.elapsed() < Duration::from_millis(200));
        assert!(worker.escalated());
        assert!(sink.contains(FORCED));
    }

    #[test]
    fn emergency_handle_matches_emergency_stop() {
        let sink = MemorySink::new();
        let mut worker = Builder::new(Duration::from_secs(5))
            .sink(sink.clone())
            .spawn(stubborn(Duration::from_millis(600)));

        let handle = worker.emergency_handle();
        thread::spawn(move || handle.trigger())
            .join()
            .unwrap();
        let started = Instant::now();

        assert_eq!(worker.shutdown(), Teardown::Detached);
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn done_flips_once_and_stays_true() {
        let mut worker = Builder::new(Duration::from_millis(200))
            .sink(MemorySink::new())
            .spawn(|_token| {});

        assert!(wait_for(|| worker.done(), Duration::from_secs(2)));
        thread::sleep(Duration::from_millis(10));
        assert!(worker.done());
        assert_eq!(worker.shutdown(), Teardown::Joined);
        assert!(worker.done());
        worker.request_stop();
        assert!(worker.done());
    }

    #[test]
    fn failing_workers_are_contained() {
        let sink = MemorySink::new();
        let mut failing = Builder::new(Duration::from_millis(200))
            .sink(sink.clone())
            .spawn(|_token| -> Result<(), io::Error> {
                Err(io::Error::new(io::ErrorKind::Other, "device gone"))
            });
        let mut panicking = Builder::new(Duration::from_millis(200))
            .sink(sink.clone())
            .spawn::<_, ()>(|_token| std::panic::panic_any(7_i64));

        assert!(failing.shutdown().is_joined());
        assert!(panicking.shutdown().is_joined());
        assert!(failing.done() && panicking.done());
        assert!(sink.contains("[TimedWorker] unhandled exception: device gone"));
        assert!(sink.contains("[TimedWorker] unknown exception"));
    }

    #[test]
    fn moved_handle_tears_down_once() {
        let sink = MemorySink::new();
        let worker = Builder::new(Duration::from_millis(10))
            .sink(sink.clone())
            .spawn(stubborn(Duration::from_millis(500)));

        let mut owners = Vec::new();
        owners.push(worker);
        let moved = owners.pop();
        drop(owners);
        drop(moved);

        let forced = sink.lines().iter().filter(|line| line.contains(FORCED)).count();
        assert_eq!(forced, 1);
    }

    #[test]
    fn second_shutdown_is_inert() {
        let mut worker = Builder::new(Duration::from_millis(200))
            .sink(MemorySink::new())
            .spawn(polite(Duration::from_millis(1)));

        assert_eq!(worker.shutdown(), Teardown::Joined);
        assert_eq!(worker.shutdown(), Teardown::Inert);
    }

    #[test]
    fn counter_worker_finishes_on_its_own() {
        let counter = Arc::new(AtomicUsize::new(0));
        let ticks = counter.clone();
        let worker = Builder::new(Duration::from_millis(500))
            .sink(MemorySink::new())
            .spawn(move |token| {
                while !token.stop_requested() && ticks.load(Ordering::SeqCst) < 5 {
                    thread::sleep(Duration::from_millis(100));
                    ticks.fetch_add(1, Ordering::SeqCst);
                }
            });

        thread::sleep(Duration::from_millis(700));
        assert!(worker.done());
        assert!(counter.load(Ordering::SeqCst) >= 5);
    }

    #[test]
    fn dropping_stubborn_worker_logs_forced_detach() {
        let sink = MemorySink::new();
        {
            let _worker = Builder::new(Duration::from_millis(10))
                .sink(sink.clone())
                .spawn(stubborn(Duration::from_secs(1)));
            thread::sleep(Duration::from_millis(50));
        }
        assert!(sink.contains(FORCED));

        let mut worker = Builder::new(Duration::from_millis(10))
            .sink(MemorySink::new())
            .spawn(stubborn(Duration::from_secs(1)));
        thread::sleep(Duration::from_millis(50));
        worker.shutdown();
        assert!(worker.detached());
    }

    #[test]
    fn zero_timeout_is_already_expired() {
        let sink = MemorySink::new();
        let mut worker = Builder::new(Duration::ZERO)
            .sink(sink.clone())
            .spawn(polite(Duration::from_millis(50)));

        let started = Instant::now();
        assert_eq!(worker.shutdown(), Teardown::Detached);
        assert!(started.elapsed() < Duration::from_millis(40));
        assert!(sink.contains(FORCED));
    }

    #[test]
    fn skip_if_stopped_policy_skips_work() {
        let stop = StopSource::new();
        stop.request_stop();
        let invoked = Arc::new(AtomicBool::new(false));
        let flag = invoked.clone();
        let mut worker = Builder::new(Duration::from_millis(200))
            .sink(MemorySink::new())
            .stop_source(stop)
            .start_policy(StartPolicy::SkipIfStopped)
            .spawn(move |_token| flag.store(true, Ordering::SeqCst));

        assert!(wait_for(|| worker.done(), Duration::from_secs(2)));
        assert_eq!(worker.shutdown(), Teardown::Joined);
        assert!(!invoked.load(Ordering::SeqCst));
    }

    #[test]
    fn always_run_policy_runs_work_after_early_stop() {
        let stop = StopSource::new();
        stop.request_stop();
        let invoked = Arc::new(AtomicBool::new(false));
        let flag = invoked.clone();
        let mut worker = Builder::new(Duration::from_millis(200))
            .sink(MemorySink::new())
            .stop_source(stop)
            .start_policy(StartPolicy::AlwaysRun)
            .spawn(move |_token| flag.store(true, Ordering::SeqCst));

        assert_eq!(worker.shutdown(), Teardown::Joined);
        assert!(invoked.load(Ordering::SeqCst));
    }

    #[test]
    fn escalate_policy_turns_stop_into_emergency() {
        let (started_tx, started_rx) = mpsc::channel();
        let sink = MemorySink::new();
        let mut worker = Builder::new(Duration::from_secs(2))
            .sink(sink.clone())
            .escalation(StopEscalation::Escalate)
            .spawn(move |token: StopToken| {
                let _ = started_tx.send(());
                while !token.stop_requested() {
                    thread::sleep(Duration::from_millis(50));
                }
                thread::sleep(Duration::from_millis(50));
            });

        started_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        worker.request_stop();
        assert!(worker.escalated());

        let started = Instant::now();
        assert_eq!(worker.shutdown(), Teardown::Detached);
        assert!(started.elapsed() < Duration::from_millis(40));
        assert!(sink.contains(FORCED));
    }

    #[test]
    fn cooperative_policy_keeps_grace_window_after_stop() {
        let (started_tx, started_rx) = mpsc::channel();
        let mut worker = Builder::new(Duration::from_secs(2))
            .sink(MemorySink::new())
            .escalation(StopEscalation::Cooperative)
            .spawn(move |token: StopToken| {
                let _ = started_tx.send(());
                while !token.stop_requested() {
                    thread::sleep(Duration::from_millis(50));
                }
            });

        started_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        worker.request_stop();
        assert!(!worker.escalated());
        assert_eq!(worker.shutdown(), Teardown::Joined);
        assert!(!worker.detached());
    }

    #[test]
    fn spawn_with_binds_arguments_in_order() {
        let (tx, rx) = mpsc::channel();
        let mut worker = TimedWorker::builder(Duration::from_millis(200))
            .sink(MemorySink::new())
            .spawn_with(
                move |_token, (label, count): (String, u32)| {
                    let _ = tx.send(format!("{}:{}", label, count));
                },
                ("ticks".to_string(), 3),
            );

        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "ticks:3");
        assert!(worker.shutdown().is_joined());
    }

    #[test]
    fn failing_sink_does_not_block_detach() {
        struct BrokenSink;

        impl LogSink for BrokenSink {
            fn write_line(&self, _line: &str) -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
        }

        let mut worker = Builder::new(Duration::from_millis(10))
            .sink(BrokenSink)
            .spawn(stubborn(Duration::from_millis(500)));

        assert_eq!(worker.shutdown(), Teardown::Detached);
        assert!(worker.detached());
    }

    #[test]
    fn worker_and_owner_share_one_sink() {
        let shared = Arc::new(WriterSink::new(Vec::new()));
        let writer = shared.clone();
        let mut worker = Builder::new(Duration::from_millis(10))
            .shared_sink(shared.clone())
            .spawn(move |_token: StopToken| {
                let started = Instant::now();
                let mut index = 0;
                while started.elapsed() < Duration::from_millis(100) {
                    writer.write_line(&format!("worker line {}", index)).unwrap();
                    index += 1;
                }
                drop(writer);
            });

        assert_eq!(worker.shutdown(), Teardown::Detached);
        drop(worker);
        assert!(wait_for(
            || Arc::strong_count(&shared) == 1,
            Duration::from_secs(2)
        ));

        let bytes = Arc::try_unwrap(shared).ok().expect("sole owner").into_inner();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.ends_with('\n'));

        let mut next = 0;
        let mut forced = 0;
        for line in text.split_terminator('\n') {
            if line == "[TimedWorker] FORCED detach - resources may leak" {
                forced += 1;
                continue;
            }
            assert_eq!(line, format!("worker line {}", next));
            next += 1;
        }
        assert_eq!(forced, 1);
        assert!(next > 0);
    }

    #[test]
    fn settings_drive_builder() {
        let settings = WorkerSettings {
            timeout_ms: -5,
            thread_name: Some("settings-probe".to_string()),
            ..WorkerSettings::default()
        };
        let worker = Builder::from_settings(settings)
            .sink(MemorySink::new())
            .spawn(|_token| {});

        assert_eq!(worker.timeout(), Duration::ZERO);
        assert_eq!(worker.name(), "settings-probe");
        assert!(worker.deadline() <= Instant::now());
    }

    #[test]
    fn try_spawn_returns_running_worker() {
        let mut worker = Builder::new(Duration::from_millis(200))
            .sink(MemorySink::new())
            .try_spawn(polite(Duration::from_millis(1)))
            .unwrap();

        assert!(!worker.detached());
        assert!(worker.shutdown().is_joined());
    }
}
