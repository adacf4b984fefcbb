//! Work functions the CLI can run on a timed worker.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use timed_worker::StopToken;

pub const SCENARIO_NAMES: [&str; 5] = ["count", "stubborn", "fail", "panic", "opaque"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Increment a counter every tick until stopped or `ticks` is reached.
    Count,
    /// Sleep without ever checking the token.
    Stubborn,
    /// Return an error.
    Fail,
    /// Panic with a message.
    Panic,
    /// Panic with a payload that is not a string.
    Opaque,
}

impl Scenario {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "count" => Some(Self::Count),
            "stubborn" => Some(Self::Stubborn),
            "fail" => Some(Self::Fail),
            "panic" => Some(Self::Panic),
            "opaque" => Some(Self::Opaque),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScenarioParams {
    pub tick: Duration,
    pub ticks: u64,
    pub jitter: Duration,
    pub stubborn: Duration,
}

/// Counters shared between the worker and the report.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    pub counter: Arc<AtomicU64>,
    pub invoked: Arc<AtomicBool>,
}

impl Probe {
    pub fn count(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    pub fn invoked(&self) -> bool {
        self.invoked.load(Ordering::SeqCst)
    }
}

/// Build the work function for `scenario`.
pub fn build(
    scenario: Scenario,
    params: ScenarioParams,
    probe: &Probe,
) -> impl FnOnce(StopToken) -> Result<(), String> + Send + 'static {
    let probe = probe.clone();
    move |token| {
        probe.invoked.store(true, Ordering::SeqCst);
        match scenario {
            Scenario::Count => {
                while !token.stop_requested() && probe.count() < params.ticks {
                    thread::sleep(params.tick + jitter(params.jitter));
                    probe.counter.fetch_add(1, Ordering::SeqCst);
                }
                Ok(())
            }
            Scenario::Stubborn => {
                thread::sleep(params.stubborn);
                Ok(())
            }
            Scenario::Fail => Err("scenario requested failure".to_string()),
            Scenario::Panic => panic!("scenario requested panic"),
            Scenario::Opaque => std::panic::panic_any(params.ticks),
        }
    }
}

fn jitter(max: Duration) -> Duration {
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
}
