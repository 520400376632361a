//! # Settings Subcommand
//!
//! Evaluates the required host settings and prints one line per rule plus
//! a summary.

use std::fmt::Write as _;

use anyhow::Result;
use clap::Args;

use oncreg_core::{ComplianceReport, SettingsComplianceChecker};

use crate::{exit_code, SharedConfig};

/// Arguments for the settings subcommand.
#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Print the results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the settings subcommand.
pub fn run_settings(args: &SettingsArgs, config: &SharedConfig) -> Result<u8> {
    let checker = SettingsComplianceChecker::new(config.clone());
    let report = checker.evaluate_all();

    if args.json {
        let out = serde_json::json!({
            "results": report,
            "summary": report.summary(),
            "all_passed": report.all_passed(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", render_settings(&report));
    }

    Ok(exit_code(report.all_passed()))
}

/// Human-readable table of the settings results.
pub fn render_settings(report: &ComplianceReport) -> String {
    let mut out = String::new();
    for r in report {
        let mark = if r.passed { "PASS" } else { "FAIL" };
        let actual = if r.actual_value.is_empty() {
            "(not set)".to_string()
        } else {
            format!("{:?}", r.actual_value)
        };
        let _ = writeln!(
            out,
            "[{mark}] {} ({}): required {:?}, actual {actual}",
            r.description, r.key, r.required_value,
        );
    }
    let s = report.summary();
    let _ = writeln!(out, "{} of {} required settings pass ({} failing)", s.passed, s.total, s.failed);
    out
}
