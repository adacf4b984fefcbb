//! # Timed Worker
//!
//! A single worker thread with a bounded lifetime. The owning [`TimedWorker`]
//! starts the work immediately, lets callers request a cooperative stop (or an
//! emergency escalation), and on teardown waits at most until its deadline
//! before abandoning a worker that never cooperates.
//!
//! ```no_run
//! use std::time::Duration;
//! use timed_worker::TimedWorker;
//!
//! let mut worker = TimedWorker::spawn(Duration::from_millis(500), |token| {
//!     while !token.stop_requested() {
//!         std::thread::sleep(Duration::from_millis(10));
//!     }
//! });
//!
//! worker.request_stop();
//! let outcome = worker.shutdown();
//! assert!(outcome.is_joined());
//! ```

pub mod cancel;
mod error;
pub mod settings;
pub mod sink;
mod worker;

pub use cancel::{EmergencyStop, StopCallback, StopSource, StopToken};
pub use error::TimedWorkerError;
pub use settings::{StartPolicy, StopEscalation, WorkerSettings};
pub use sink::{LogFacadeSink, LogSink, MemorySink, StderrSink, WriterSink};
pub use worker::{Builder, Teardown, TimedWorker, WorkResult};
