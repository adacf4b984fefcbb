use std::fmt::{Display, Formatter};

/// Error type for settings IO/parsing and fallible worker construction.
///
/// Nothing raised inside a worker or during teardown is reported through this
/// type; those outcomes are only observable through the log sink and
/// [`TimedWorker::detached`](crate::TimedWorker::detached).
#[derive(Debug)]
pub enum TimedWorkerError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Spawn(std::io::Error),
}

impl Display for TimedWorkerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Parse(err) => write!(f, "invalid worker settings: {}", err),
            Self::Spawn(err) => write!(f, "failed to spawn worker thread: {}", err),
        }
    }
}

impl std::error::Error for TimedWorkerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) | Self::Spawn(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TimedWorkerError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for TimedWorkerError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}
