//! Line-oriented log sinks shared between a worker thread and its owner.
//!
//! A sink only ever receives appended lines; nothing reads back from it. Every
//! implementation here serializes its own writes, so the worker routine and the
//! owner's teardown can both hold an `Arc<dyn LogSink>` to the same sink.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::Level;

/// Default number of lines retained by a [`MemorySink`].
pub const DEFAULT_MEMORY_CAPACITY: usize = 500;

/// Append-only text sink.
pub trait LogSink: Send + Sync {
    /// Write one line. The sink adds its own terminator.
    fn write_line(&self, line: &str) -> io::Result<()>;
}

/// Write `line` to `sink`, suppressing any error or panic raised by the sink.
pub(crate) fn emit(sink: &dyn LogSink, line: &str) {
    match panic::catch_unwind(AssertUnwindSafe(|| sink.write_line(line))) {
        Ok(Ok(())) => {}
        Ok(Err(err)) => log::warn!("log sink write failed: {}", err),
        Err(_) => log::warn!("log sink panicked during write"),
    }
}

/// Writes each line to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{}", line)
    }
}

/// Wraps any writer behind an internal lock.
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", line)?;
        writer.flush()
    }
}

/// Bounded in-memory capture of the most recent lines.
///
/// Cloning shares the buffer, so a caller can keep one clone for inspection
/// and hand another to the worker.
#[derive(Clone, Debug)]
pub struct MemorySink {
    capacity: usize,
    lines: Arc<Mutex<VecDeque<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }

    /// Keep at most `capacity` lines, evicting the oldest. A capacity of `0`
    /// is treated as `1`.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
        }
    }

    fn buffer(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the retained lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.buffer().iter().cloned().collect()
    }

    /// Whether any retained line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.buffer().iter().any(|line| line.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    pub fn clear(&self) {
        self.buffer().clear();
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut buffer = self.buffer();
        if buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(line.to_string());
        Ok(())
    }
}

/// Forwards each line to the `log` facade.
#[derive(Debug, Clone, Copy)]
pub struct LogFacadeSink {
    level: Level,
}

impl LogFacadeSink {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Default for LogFacadeSink {
    fn default() -> Self {
        Self::new(Level::Warn)
    }
}

impl LogSink for LogFacadeSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        log::log!(target: "timed_worker", self.level, "{}", line);
        Ok(())
    }
}
