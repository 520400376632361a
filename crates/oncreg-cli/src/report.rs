//! # Report Subcommand
//!
//! Gathers everything the registration dashboard shows into one
//! [`DashboardReport`]: organization profile, NPI check, required settings,
//! listing status, and the pre-filled registration email.
//!
//! The report passes (exit code 0) only when every required setting
//! passes, the profile is complete, the NPI is valid, and, unless
//! `--skip-verify` is given, the endpoint is listed.

use std::fmt::Write as _;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use oncreg_core::{
    validate_npi, ComplianceReport, ComplianceSummary, ConfigurationSource, IdentifierValidation,
    SettingsComplianceChecker,
};
use oncreg_registry::{
    check_registration_info, email_body, mailto_link, RegistrationInfo, RegistrationProfile,
    VerificationResult, REGISTRATION_EMAIL, REGISTRATION_SUBJECT,
};

use crate::verify::{build_verifier, verifier_config, ListingArgs};
use crate::{exit_code, SharedConfig};

/// Arguments for the report subcommand.
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub listing: ListingArgs,

    /// Do not fetch the listing page.
    #[arg(long)]
    pub skip_verify: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganizationSection {
    pub name: String,
    pub location: String,
    pub npi: String,
    pub fhir_endpoint: String,
    pub detected_fhir_endpoint: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionSection {
    pub email: String,
    pub subject: String,
    pub body: String,
    pub mailto: String,
}

/// Everything the registration dashboard displays.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub enabled: bool,
    pub configured: bool,
    pub organization: OrganizationSection,
    /// Absent when no NPI is configured.
    pub npi_validation: Option<IdentifierValidation>,
    pub registration_info: RegistrationInfo,
    pub registration_date: String,
    pub registration_status: String,
    pub settings: ComplianceReport,
    pub settings_summary: ComplianceSummary,
    pub listing_page_url: String,
    /// Absent when the listing page was not checked.
    pub verification: Option<VerificationResult>,
    pub submission: SubmissionSection,
}

impl DashboardReport {
    /// Assemble the report from configuration and an optional listing check.
    pub fn collect<C: ConfigurationSource>(
        config: C,
        listing_page_url: &str,
        verification: Option<VerificationResult>,
    ) -> Self {
        let settings = SettingsComplianceChecker::new(&config).evaluate_all();
        let settings_summary = settings.summary();
        let profile = RegistrationProfile::new(&config);

        let npi = profile.org_npi();
        let npi_validation = if npi.is_empty() {
            None
        } else {
            Some(validate_npi(&npi))
        };

        Self {
            enabled: profile.is_enabled(),
            configured: profile.is_configured(),
            organization: OrganizationSection {
                name: profile.org_name(),
                location: profile.org_location(),
                npi,
                fhir_endpoint: profile.fhir_endpoint(),
                detected_fhir_endpoint: profile.detected_fhir_endpoint(),
            },
            npi_validation,
            registration_info: check_registration_info(&profile),
            registration_date: profile.registration_date(),
            registration_status: profile.registration_status(),
            settings,
            settings_summary,
            listing_page_url: listing_page_url.to_string(),
            verification,
            submission: SubmissionSection {
                email: REGISTRATION_EMAIL.to_string(),
                subject: REGISTRATION_SUBJECT.to_string(),
                body: email_body(&profile),
                mailto: mailto_link(&profile),
            },
        }
    }

    /// Whether every section of the report is in order.
    pub fn passed(&self) -> bool {
        self.settings.all_passed()
            && self.registration_info.complete
            && self.npi_validation.as_ref().is_some_and(|v| v.valid)
            && self.verification.as_ref().map_or(true, |v| v.registered)
    }

    /// Human-readable rendering.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let org = &self.organization;

        let _ = writeln!(out, "ONC Registration Report");
        let _ = writeln!(out, "=======================");
        let _ = writeln!(out, "Enabled:      {}", yes_no(self.enabled));
        let _ = writeln!(out, "Configured:   {}", yes_no(self.configured));
        let _ = writeln!(out);

        let _ = writeln!(out, "Organization");
        let _ = writeln!(out, "  Name:          {}", or_unset(&org.name));
        let _ = writeln!(out, "  Location:      {}", or_unset(&org.location));
        let npi_note = match &self.npi_validation {
            None => String::new(),
            Some(v) if v.valid => " (valid)".to_string(),
            Some(v) => format!(" (invalid: {})", v.error.as_deref().unwrap_or_default()),
        };
        let _ = writeln!(out, "  NPI:           {}{npi_note}", or_unset(&org.npi));
        let _ = writeln!(out, "  FHIR endpoint: {}", or_unset(&org.fhir_endpoint));
        if org.fhir_endpoint != org.detected_fhir_endpoint {
            let _ = writeln!(out, "  Detected:      {}", or_unset(&org.detected_fhir_endpoint));
        }
        if !self.registration_status.is_empty() || !self.registration_date.is_empty() {
            let _ = writeln!(
                out,
                "  Registration:  {} {}",
                or_unset(&self.registration_status),
                self.registration_date
            );
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "Required settings");
        for r in &self.settings {
            let mark = if r.passed { "PASS" } else { "FAIL" };
            let _ = writeln!(out, "  [{mark}] {} ({})", r.description, r.key);
        }
        let s = self.settings_summary;
        let _ = writeln!(out, "  {} of {} pass", s.passed, s.total);
        let _ = writeln!(out);

        let _ = writeln!(out, "Listing page: {}", self.listing_page_url);
        let status = match &self.verification {
            None => "not checked".to_string(),
            Some(VerificationResult { error: Some(e), .. }) => format!("unknown ({e})"),
            Some(v) if v.registered => "listed".to_string(),
            Some(_) => "not listed".to_string(),
        };
        let _ = writeln!(out, "  Status: {status}");
        let _ = writeln!(out);

        if self.registration_info.complete {
            let _ = writeln!(out, "Ready to submit to {}", self.submission.email);
        } else {
            let _ = writeln!(out, "Missing before submission:");
            for m in &self.registration_info.missing {
                let _ = writeln!(out, "  - {m}");
            }
        }
        let _ = writeln!(out, "  {}", self.submission.mailto);
        out
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

fn or_unset(s: &str) -> &str {
    if s.is_empty() {
        "(not set)"
    } else {
        s
    }
}

/// Execute the report subcommand.
///
/// With `--skip-verify` no HTTP client is built, so the report works
/// offline.
pub fn run_report(args: &ReportArgs, config: &SharedConfig) -> Result<u8> {
    let listing_page_url = verifier_config(&args.listing).listing_page_url;
    let verification = if args.skip_verify {
        tracing::debug!("skipping listing page check");
        None
    } else {
        Some(build_verifier(config, &args.listing)?.verify())
    };

    let report = DashboardReport::collect(config.clone(), &listing_page_url, verification);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }

    Ok(exit_code(report.passed()))
}
