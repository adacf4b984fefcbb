//! # Timed Worker CLI
//!
//! A command-line driver that runs timed-worker scenarios and reports how
//! their teardown ended.

use log::error;

mod cli;
mod logging;
mod runner;
mod signals;

fn main() {
    dotenv::dotenv().ok();
    let log_buffer = logging::init();
    let args = cli::args::build_cli().get_matches();

    // For any error, return an exit code -1. Otherwise return the exit code provided.
    let code = match runner::run(&args, log_buffer) {
        Ok(code) => code,
        Err(err) => {
            let message = err.to_string().to_lowercase();
            error!("{}", message);
            eprintln!("error: {}", message);
            -1
        }
    };

    std::process::exit(code)
}
