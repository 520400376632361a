//! # Verify Subcommand
//!
//! Checks whether the FHIR endpoint is listed on the published Service Base
//! URLs page.

use std::fmt::Write as _;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use oncreg_core::SystemClock;
use oncreg_registry::{HttpPageFetcher, RegistrationVerifier, VerificationResult, VerifierConfig};

use crate::{exit_code, SharedConfig};

/// Verifier wired to the live listing page.
pub type LiveVerifier = RegistrationVerifier<SharedConfig, HttpPageFetcher, SystemClock>;

/// Listing page overrides shared by `verify` and `report`.
#[derive(Args, Debug, Clone, Default)]
pub struct ListingArgs {
    /// Listing page to scan instead of the default for this host version.
    #[arg(long)]
    pub listing_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

/// Arguments for the verify subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub listing: ListingArgs,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Verifier settings with any command-line overrides applied.
pub fn verifier_config(listing: &ListingArgs) -> VerifierConfig {
    let mut settings = VerifierConfig::default();
    if let Some(url) = &listing.listing_url {
        settings.listing_page_url = url.clone();
    }
    if let Some(secs) = listing.timeout_secs {
        settings.fetch_timeout = Duration::from_secs(secs);
    }
    settings
}

/// Build a verifier that fetches over HTTP.
pub fn build_verifier(config: &SharedConfig, listing: &ListingArgs) -> Result<LiveVerifier> {
    let settings = verifier_config(listing);
    let fetcher = HttpPageFetcher::new(&settings.user_agent).context("building HTTP client")?;
    Ok(RegistrationVerifier::with_config(
        config.clone(),
        fetcher,
        SystemClock,
        settings,
    ))
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs, config: &SharedConfig) -> Result<u8> {
    let verifier = build_verifier(config, &args.listing)?;
    let endpoint = verifier.expected_endpoint();
    let result = verifier.verify();

    if args.json {
        let out = serde_json::json!({
            "listing_page_url": verifier.listing_page_url(),
            "expected_endpoint": endpoint,
            "registered": result.registered,
            "error": result.error,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!(
            "{}",
            render_verification(verifier.listing_page_url(), &endpoint, &result)
        );
    }

    Ok(exit_code(result.registered))
}

/// Human-readable verification outcome.
pub fn render_verification(
    listing_page_url: &str,
    endpoint: &str,
    result: &VerificationResult,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Listing page:      {listing_page_url}");
    let shown = if endpoint.is_empty() { "(not configured)" } else { endpoint };
    let _ = writeln!(out, "Expected endpoint: {shown}");
    let status = match (&result.error, result.registered) {
        (Some(reason), _) => format!("UNKNOWN ({reason})"),
        (None, true) => "REGISTERED".to_string(),
        (None, false) => "NOT LISTED".to_string(),
    };
    let _ = writeln!(out, "Status:            {status}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_defaults() {
        let listing = ListingArgs {
            listing_url: Some("https://listing.test/".to_string()),
            timeout_secs: Some(3),
        };
        let settings = verifier_config(&listing);
        assert_eq!(settings.listing_page_url, "https://listing.test/");
        assert_eq!(settings.fetch_timeout, Duration::from_secs(3));
        assert_eq!(settings.user_agent, VerifierConfig::default().user_agent);
    }

    #[test]
    fn no_overrides_keep_defaults() {
        assert_eq!(verifier_config(&ListingArgs::default()), VerifierConfig::default());
    }

    #[test]
    fn render_distinguishes_unknown_from_not_listed() {
        let unknown = render_verification(
            "https://listing.test/",
            "",
            &VerificationResult::unavailable("FHIR endpoint not configured"),
        );
        assert!(unknown.contains("Expected endpoint: (not configured)"));
        assert!(unknown.contains("Status:            UNKNOWN (FHIR endpoint not configured)"));

        let missing = render_verification(
            "https://listing.test/",
            "https://emr.example.com/apis/default/fhir/r4",
            &VerificationResult::registered(false),
        );
        assert!(missing.contains("NOT LISTED"));

        let listed = render_verification(
            "https://listing.test/",
            "https://emr.example.com/apis/default/fhir/r4",
            &VerificationResult::registered(true),
        );
        assert!(listed.contains("REGISTERED"));
    }
}
