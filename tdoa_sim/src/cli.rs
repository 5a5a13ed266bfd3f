use clap::Parser;
use std::path::PathBuf;

use crate::logging::LogLevel;

/// tdoa_sim: runs a TDOA EKF against a simulated agent and ranging transport.
///
/// This struct defines the command-line arguments of the `tdoa_sim` binary.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run. Built-in defaults are used when omitted.
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// Log verbosity (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Overrides the scenario's PRNG seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Overrides the scenario's duration, in seconds.
    #[arg(short, long)]
    pub duration: Option<f64>,
}
