use log::{LevelFilter, Log, Metadata, Record};
use std::sync::OnceLock;
use timed_worker::{LogSink, MemorySink};

const LOG_CAPACITY: usize = 500;

/// Most recent log records, shared with the installed logger.
pub type LogBuffer = MemorySink;

struct BufferedLogger {
    level: LevelFilter,
    records: MemorySink,
    echo_stderr: bool,
}

impl Log for BufferedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!("[{}] {}: {}", record.level(), record.target(), record.args());
        if self.echo_stderr {
            eprintln!("{}", line);
        }
        // In-memory writes cannot fail.
        let _ = self.records.write_line(&line);
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<BufferedLogger> = OnceLock::new();

/// Install the process logger and return its record buffer.
///
/// `RUST_LOG` takes a single level name (defaults to `info`);
/// `TIMED_WORKER_LOG_STDERR` set to anything but `0` echoes records to stderr.
pub fn init() -> LogBuffer {
    let logger = LOGGER.get_or_init(|| BufferedLogger {
        level: std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| level.parse().ok())
            .unwrap_or(LevelFilter::Info),
        records: MemorySink::with_capacity(LOG_CAPACITY),
        echo_stderr: std::env::var("TIMED_WORKER_LOG_STDERR").is_ok_and(|value| value != "0"),
    });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.level);
    }

    logger.records.clone()
}
