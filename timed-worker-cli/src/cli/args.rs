//! CLI argument definitions for `tw`.

use clap::{value_parser, Arg, ArgAction, Command};

use super::scenario::SCENARIO_NAMES;

/// Build the CLI argument parser and command definitions.
pub fn build_cli() -> Command {
    Command::new("tw")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run a bounded-lifetime worker and report its teardown")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Spawn one worker, wait, then tear it down")
                .arg(
                    Arg::new("scenario")
                        .long("scenario")
                        .short('s')
                        .value_name("NAME")
                        .value_parser(SCENARIO_NAMES)
                        .default_value("count")
                        .help("Work to run on the worker thread"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .value_name("PATH")
                        .help("Path to a JSON file containing WorkerSettings"),
                )
                .arg(
                    Arg::new("timeout-ms")
                        .long("timeout-ms")
                        .short('t')
                        .value_name("MS")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i64))
                        .help("Teardown grace period; overrides the config file"),
                )
                .arg(
                    Arg::new("wait-ms")
                        .long("wait-ms")
                        .short('w')
                        .value_name("MS")
                        .value_parser(value_parser!(u64))
                        .default_value("700")
                        .help("How long to let the worker run before teardown"),
                )
                .arg(
                    Arg::new("tick-ms")
                        .long("tick-ms")
                        .value_name("MS")
                        .value_parser(value_parser!(u64))
                        .default_value("100")
                        .help("Sleep between counter increments"),
                )
                .arg(
                    Arg::new("ticks")
                        .long("ticks")
                        .value_name("COUNT")
                        .value_parser(value_parser!(u64))
                        .default_value("5")
                        .help("Increments after which the counter scenario finishes"),
                )
                .arg(
                    Arg::new("jitter-ms")
                        .long("jitter-ms")
                        .value_name("MS")
                        .value_parser(value_parser!(u64))
                        .default_value("0")
                        .help("Random extra sleep added to each tick"),
                )
                .arg(
                    Arg::new("stubborn-ms")
                        .long("stubborn-ms")
                        .value_name("MS")
                        .value_parser(value_parser!(u64))
                        .default_value("1000")
                        .help("How long the stubborn scenario ignores cancellation"),
                )
                .arg(
                    Arg::new("emergency-after-ms")
                        .long("emergency-after-ms")
                        .value_name("MS")
                        .value_parser(value_parser!(u64))
                        .help("Escalate to an emergency stop after this long"),
                )
                .arg(
                    Arg::new("stop-first")
                        .long("stop-first")
                        .action(ArgAction::SetTrue)
                        .help("Request stop before the worker starts"),
                )
                .arg(
                    Arg::new("always-run")
                        .long("always-run")
                        .action(ArgAction::SetTrue)
                        .help("Run the work even if stop was requested before it started"),
                )
                .arg(
                    Arg::new("escalate")
                        .long("escalate")
                        .action(ArgAction::SetTrue)
                        .help("Treat any stop request as an emergency during teardown"),
                )
                .arg(
                    Arg::new("sink")
                        .long("sink")
                        .value_name("KIND")
                        .value_parser(["stderr", "capture", "log"])
                        .default_value("stderr")
                        .help("Where worker failures and forced detaches are written"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the run report as JSON"),
                )
                .arg(
                    Arg::new("show-log")
                        .long("show-log")
                        .action(ArgAction::SetTrue)
                        .help("Print buffered log records after the report"),
                ),
        )
        .subcommand(
            Command::new("create")
                .about("Emit default JSON payloads")
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("settings-json")
                        .about("Print a default WorkerSettings JSON payload"),
                ),
        )
}
