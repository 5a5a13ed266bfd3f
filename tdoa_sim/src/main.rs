// tdoa_sim/src/main.rs

//! Runs one TDOA scenario end to end and prints a summary.
//!
//! `cargo run -p tdoa_sim -- --scenario tdoa_sim/assets/scenarios/lab_square.toml`

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use tdoa_sim::cli::Cli;
use tdoa_sim::prelude::*;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match run(&cli) {
        Ok(report) => {
            println!(
                "estimate ({:.3}, {:.3}, {:.3})  truth ({:.3}, {:.3}, {:.3})",
                report.final_estimate.x,
                report.final_estimate.y,
                report.final_estimate.z,
                report.final_truth.x,
                report.final_truth.y,
                report.final_truth.z,
            );
            println!(
                "horizontal error: final {:.4} m, rms {:.4} m  ({} predictions, {} updates, {} rejected)",
                report.final_horizontal_error,
                report.rms_horizontal_error,
                report.stats.predictions,
                report.stats.updates,
                report.stats.rejected_updates,
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "simulation failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<RunReport, SimError> {
    let mut config = load_scenario(cli.scenario.as_deref())?;
    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(duration) = cli.duration {
        config.simulation.duration_seconds = duration;
    }
    // Overrides bypass the figment layer, so check again.
    config.validate()?;

    if let Some(path) = &cli.scenario {
        info!(scenario = %path.display(), "loaded scenario");
    }
    let report = run_scenario(&config)?;
    for (kind, count) in &report.rejections {
        info!(kind, count, "rejected updates");
    }
    Ok(report)
}
