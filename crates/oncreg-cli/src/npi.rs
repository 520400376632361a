//! # NPI Subcommand
//!
//! Validates a National Provider Identifier and prints
//! `{"valid": …, "error": …}`.

use anyhow::{bail, Result};
use clap::Args;

use oncreg_core::validate_npi;

use crate::exit_code;

/// Arguments for the npi subcommand.
#[derive(Args, Debug)]
pub struct NpiArgs {
    /// NPI to validate. Spaces and hyphens are ignored.
    pub value: String,
}

/// Execute the npi subcommand.
pub fn run_npi(args: &NpiArgs) -> Result<u8> {
    if args.value.is_empty() {
        bail!("NPI is required");
    }

    let result = validate_npi(&args.value);
    tracing::debug!(valid = result.valid, "validated NPI");
    println!("{}", serde_json::to_string(&result)?);
    Ok(exit_code(result.valid))
}
