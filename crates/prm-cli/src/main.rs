//! # prm CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use prm_cli::baseline::{run_baseline_cmd, BaselineArgs};
use prm_cli::lookup::{run_econ_limits, run_system_type, EconLimitsArgs, SystemTypeArgs};
use prm_cli::standards::{run_standards, StandardsArgs};

/// ASHRAE 90.1 Appendix G baseline toolchain
///
/// Looks up code-mandated air-loop requirements, selects baseline systems,
/// and transforms proposed models into Appendix G baseline models.
#[derive(Parser, Debug)]
#[command(name = "prm", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Economizer high limits for one air loop of a model.
    EconLimits(EconLimitsArgs),

    /// Baseline system number and heating fuel for an area type.
    SystemType(SystemTypeArgs),

    /// Apply the baseline rules to a proposed model.
    Baseline(BaselineArgs),

    /// Standards database operations.
    Standards(StandardsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "prm starting");

    let result = match &cli.command {
        Commands::EconLimits(args) => run_econ_limits(args),
        Commands::SystemType(args) => run_system_type(args),
        Commands::Baseline(args) => run_baseline_cmd(args),
        Commands::Standards(args) => run_standards(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
