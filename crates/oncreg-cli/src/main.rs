//! # oncreg CLI entry point
//!
//! Parses command-line arguments, loads host settings, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use oncreg_cli::load_config;
use oncreg_cli::npi::{run_npi, NpiArgs};
use oncreg_cli::report::{run_report, ReportArgs};
use oncreg_cli::settings::{run_settings, SettingsArgs};
use oncreg_cli::verify::{run_verify, VerifyArgs};

/// ONC registration checks for an OpenEMR installation.
///
/// Evaluates the settings required for ONC certification, validates the
/// organization NPI, and checks whether the FHIR endpoint is published.
#[derive(Parser, Debug)]
#[command(name = "oncreg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML file of host settings.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check the host settings required for ONC registration.
    Settings(SettingsArgs),

    /// Validate a National Provider Identifier.
    Npi(NpiArgs),

    /// Check whether the FHIR endpoint is on the published listing page.
    Verify(VerifyArgs),

    /// Full registration dashboard report.
    Report(ReportArgs),
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
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "oncreg starting");

    // `npi` needs no host settings, so a bad settings file does not block it.
    let settings = cli.settings.as_deref();
    let result = match cli.command {
        Commands::Npi(args) => run_npi(&args),
        Commands::Settings(args) => load_config(settings).and_then(|c| run_settings(&args, &c)),
        Commands::Verify(args) => load_config(settings).and_then(|c| run_verify(&args, &c)),
        Commands::Report(args) => load_config(settings).and_then(|c| run_report(&args, &c)),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
