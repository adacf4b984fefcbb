//! Serializable worker configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::TimedWorkerError;

const DEFAULT_TIMEOUT_MS: i64 = 500;
const DEFAULT_LOG_CAPACITY: usize = crate::sink::DEFAULT_MEMORY_CAPACITY;

/// What the worker routine does when stop was requested before the work
/// function starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartPolicy {
    /// Skip the work function entirely; `done` is still published.
    #[default]
    SkipIfStopped,
    /// Invoke the work function regardless; it sees the stopped token.
    AlwaysRun,
}

/// Whether a cooperative stop counts as an emergency during teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopEscalation {
    /// Only [`emergency_stop`](crate::TimedWorker::emergency_stop) collapses
    /// the teardown window; a cooperative stop keeps the full grace period.
    #[default]
    Cooperative,
    /// The worker's stop callback raises the emergency flag, so any stop
    /// (including the one teardown issues itself) collapses the window to
    /// zero.
    Escalate,
}

/// Settings payload for a [`TimedWorker`](crate::TimedWorker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerSettings {
    /// Grace period in milliseconds. Negative values are treated as zero.
    pub timeout_ms: i64,
    pub start_policy: StartPolicy,
    pub escalation: StopEscalation,
    /// Name given to the worker thread.
    pub thread_name: Option<String>,
    /// Line capacity used when the caller asks for an in-memory sink.
    pub log_capacity: usize,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            start_policy: StartPolicy::default(),
            escalation: StopEscalation::default(),
            thread_name: None,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl WorkerSettings {
    /// Create settings with the given timeout and default policies.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout_ms: i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX),
            ..Self::default()
        }
    }

    /// Resolved grace period. Zero or negative configured values become
    /// [`Duration::ZERO`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(0) as u64)
    }

    /// Parse settings from a JSON document. Missing fields take defaults.
    ///
    /// # Errors
    /// Returns [`TimedWorkerError::Parse`] if the JSON is malformed or a field
    /// has the wrong type.
    pub fn from_json_str(json: &str) -> Result<Self, TimedWorkerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse settings from a JSON file.
    ///
    /// # Errors
    /// Returns [`TimedWorkerError::Io`] if the file cannot be read, or
    /// [`TimedWorkerError::Parse`] if its contents are not valid settings.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TimedWorkerError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Pretty-printed JSON for this payload.
    pub fn to_json_pretty(&self) -> Result<String, TimedWorkerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
