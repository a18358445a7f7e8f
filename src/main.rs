//! Runs the summation-order experiment and prints the report to stdout.

use std::io::{self, Write};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use u_sumorder::experiment::{self, ExperimentConfig};
use u_sumorder::report;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("u_sumorder=info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = ExperimentConfig::default();
    let experiment = match experiment::run(&config) {
        Ok(experiment) => experiment,
        Err(e) => {
            tracing::error!("experiment failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = report::write_experiment(&mut out, &experiment).and_then(|()| out.flush()) {
        tracing::error!("failed to write report: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
