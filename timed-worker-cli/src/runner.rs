use std::sync::Arc;
use std::thread::sleep;
use std::time::{Duration, Instant};

use clap::ArgMatches;
use log::info;
use serde::Serialize;
use timed_worker::{
    Builder, LogFacadeSink, LogSink, MemorySink, StartPolicy, StderrSink, StopEscalation,
    StopSource, Teardown, TimedWorker, TimedWorkerError, WorkerSettings,
};

use crate::cli::scenario::{self, Probe, Scenario, ScenarioParams};
use crate::logging::LogBuffer;
use crate::signals;

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Summary printed after a run.
#[derive(Debug, Serialize)]
struct RunReport {
    scenario: String,
    timeout_ms: u128,
    invoked: bool,
    counter: u64,
    done: bool,
    teardown: &'static str,
    detached: bool,
    teardown_ms: u128,
}

pub fn run(args: &ArgMatches, log_buffer: LogBuffer) -> Result<i32, TimedWorkerError> {
    match args.subcommand() {
        Some(("run", sub)) => run_scenario(sub, &log_buffer),
        Some(("create", sub)) => create(sub),
        _ => Ok(2),
    }
}

/// Worker sink selected with `--sink`. A captured sink is printed after the
/// report.
fn worker_sink(args: &ArgMatches, capacity: usize) -> (Arc<dyn LogSink>, Option<MemorySink>) {
    let kind = args.get_one::<String>("sink").map(String::as_str);
    let captured = (kind == Some("capture")).then(|| MemorySink::with_capacity(capacity));
    let sink: Arc<dyn LogSink> = match (&captured, kind) {
        (Some(captured), _) => Arc::new(captured.clone()),
        (None, Some("log")) => Arc::new(LogFacadeSink::default()),
        (None, _) => Arc::new(StderrSink),
    };
    (sink, captured)
}

fn create(args: &ArgMatches) -> Result<i32, TimedWorkerError> {
    match args.subcommand() {
        Some(("settings-json", _)) => {
            println!("{}", WorkerSettings::default().to_json_pretty()?);
            Ok(0)
        }
        _ => Ok(2),
    }
}

fn resolve_settings(args: &ArgMatches) -> Result<WorkerSettings, TimedWorkerError> {
    let mut settings = match args.get_one::<String>("config") {
        Some(path) => WorkerSettings::from_json_file(path)?,
        None => WorkerSettings::default(),
    };

    if let Some(timeout_ms) = args.get_one::<i64>("timeout-ms") {
        settings.timeout_ms = *timeout_ms;
    }
    if args.get_flag("always-run") {
        settings.start_policy = StartPolicy::AlwaysRun;
    }
    if args.get_flag("escalate") {
        settings.escalation = StopEscalation::Escalate;
    }
    Ok(settings)
}

fn millis(args: &ArgMatches, id: &str) -> Duration {
    Duration::from_millis(args.get_one::<u64>(id).copied().unwrap_or(0))
}

fn run_scenario(args: &ArgMatches, log_buffer: &LogBuffer) -> Result<i32, TimedWorkerError> {
    let settings = resolve_settings(args)?;
    let name = args
        .get_one::<String>("scenario")
        .map(String::as_str)
        .unwrap_or("count");
    let Some(scenario) = Scenario::from_name(name) else {
        eprintln!("Unknown scenario: {}", name);
        return Ok(2);
    };

    let params = ScenarioParams {
        tick: millis(args, "tick-ms"),
        ticks: args.get_one::<u64>("ticks").copied().unwrap_or(5),
        jitter: millis(args, "jitter-ms"),
        stubborn: millis(args, "stubborn-ms"),
    };
    let wait = millis(args, "wait-ms");
    let emergency_after = args
        .get_one::<u64>("emergency-after-ms")
        .map(|ms| Duration::from_millis(*ms));

    let stop = StopSource::new();
    if args.get_flag("stop-first") {
        stop.request_stop();
    }

    info!("Starting {:?} scenario with {:?}", scenario, settings);
    let probe = Probe::default();
    let (sink, captured) = worker_sink(args, settings.log_capacity);
    let mut worker = Builder::from_settings(settings)
        .shared_sink(sink)
        .stop_source(stop)
        .try_spawn(scenario::build(scenario, params, &probe))?;
    signals::install(worker.emergency_handle());

    wait_for_worker(&worker, wait, emergency_after);

    let done = worker.done();
    let started = Instant::now();
    let teardown = worker.shutdown();
    let report = RunReport {
        scenario: name.to_string(),
        timeout_ms: worker.timeout().as_millis(),
        invoked: probe.invoked(),
        counter: probe.count(),
        done,
        teardown: teardown_label(teardown),
        detached: worker.detached(),
        teardown_ms: started.elapsed().as_millis(),
    };
    info!("Worker {} finished with {:?}", worker.name(), teardown);

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Some(captured) = captured {
        for line in captured.lines() {
            println!("sink: {}", line);
        }
    }

    if args.get_flag("show-log") {
        for line in log_buffer.lines() {
            println!("{}", line);
        }
    }

    Ok(0)
}

/// Sleep for `wait`, escalating after `emergency_after` if given. Returns
/// early once the worker is done or has been escalated (e.g. by SIGINT).
fn wait_for_worker(worker: &TimedWorker, wait: Duration, emergency_after: Option<Duration>) {
    let started = Instant::now();
    while started.elapsed() < wait {
        if let Some(after) = emergency_after {
            if started.elapsed() >= after && !worker.escalated() {
                info!("Escalating to emergency stop");
                worker.emergency_stop();
            }
        }
        if worker.done() || worker.escalated() {
            break;
        }
        sleep(POLL_INTERVAL.min(wait.saturating_sub(started.elapsed())));
    }
}

fn teardown_label(teardown: Teardown) -> &'static str {
    match teardown {
        Teardown::Inert => "inert",
        Teardown::Joined => "joined",
        Teardown::Detached => "detached",
    }
}

fn print_report(report: &RunReport) {
    println!("scenario: {}", report.scenario);
    println!("timeout_ms: {}", report.timeout_ms);
    println!("invoked: {}", report.invoked);
    println!("counter: {}", report.counter);
    println!("done: {}", report.done);
    println!("teardown: {}", report.teardown);
    println!("detached: {}", report.detached);
    println!("teardown_ms: {}", report.teardown_ms);
}
