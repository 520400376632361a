//! # Registration Submission
//!
//! Registration is submitted by email. This module checks that the
//! profile has everything the email needs and renders the message and a
//! `mailto:` link for it.

use oncreg_core::ConfigurationSource;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::profile::RegistrationProfile;

/// Address registrations are sent to.
pub const REGISTRATION_EMAIL: &str = "hello@open-emr.org";

/// Subject line of the registration email.
pub const REGISTRATION_SUBJECT: &str = "ONC registration";

/// Whether the profile has everything a registration needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationInfo {
    pub complete: bool,
    /// One entry per missing field, with where to set it.
    pub missing: Vec<String>,
}

/// List the registration fields that are still empty.
pub fn check_registration_info<C: ConfigurationSource>(
    profile: &RegistrationProfile<C>,
) -> RegistrationInfo {
    let mut missing = Vec::new();

    if profile.org_name().is_empty() {
        missing.push("Organization Name (set in Admin > Facilities on your primary facility)".to_string());
    }
    if profile.org_location().is_empty() {
        missing.push("Organization Location (set address in Admin > Facilities)".to_string());
    }
    if profile.org_npi().is_empty() {
        missing.push("Organization NPI (set Facility NPI in Admin > Facilities)".to_string());
    }
    if profile.fhir_endpoint().is_empty() {
        missing.push("FHIR Endpoint (configure site_addr_oath in Globals > Connectors)".to_string());
    }

    RegistrationInfo {
        complete: missing.is_empty(),
        missing,
    }
}

/// Body of the registration email.
pub fn email_body<C: ConfigurationSource>(profile: &RegistrationProfile<C>) -> String {
    format!(
        "Organization Name: {}\n\
         \n\
         Organization Location: {}\n\
         \n\
         Organization NPI: {}\n\
         \n\
         FHIR Endpoint URL: {}\n\
         \n\
         ---\n\
         Submitted via ONC Registration Module",
        profile.org_name(),
        profile.org_location(),
        profile.org_npi(),
        profile.fhir_endpoint(),
    )
}

/// `mailto:` link that opens a pre-filled registration email.
pub fn mailto_link<C: ConfigurationSource>(profile: &RegistrationProfile<C>) -> String {
    format!(
        "mailto:{REGISTRATION_EMAIL}?subject={}&body={}",
        percent_encode(REGISTRATION_SUBJECT),
        percent_encode(&email_body(profile)),
    )
}

/// Bytes escaped in mailto parts: everything except the RFC 3986
/// unreserved set (`A-Z a-z 0-9 - . _ ~`).
const MAILTO_ESCAPED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, MAILTO_ESCAPED).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oncreg_core::config::keys;
    use oncreg_core::InMemoryConfig;

    fn acme() -> InMemoryConfig {
        InMemoryConfig::new()
            .with(keys::ORG_NAME, "Acme Medical Center")
            .with(keys::ORG_LOCATION, "123 Main St, Springfield, IL 62701")
            .with(keys::ORG_NPI, "1234567893")
            .with(keys::SITE_ADDRESS, "https://emr.example.com")
    }

    #[test]
    fn email_body_includes_all_organization_info() {
        let body = email_body(&RegistrationProfile::new(acme()));
        assert!(body.contains("Organization Name: Acme Medical Center"));
        assert!(body.contains("Organization Location: 123 Main St, Springfield, IL 62701"));
        assert!(body.contains("Organization NPI: 1234567893"));
        assert!(body.contains("FHIR Endpoint URL: https://emr.example.com/apis/default/fhir/r4"));
        assert!(body.ends_with("---\nSubmitted via ONC Registration Module"));
    }

    #[test]
    fn email_body_with_empty_profile_keeps_labels() {
        let body = email_body(&RegistrationProfile::new(InMemoryConfig::new()));
        assert!(body.starts_with("Organization Name: \n\nOrganization Location: \n"));
        assert!(body.contains("FHIR Endpoint URL: \n"));
    }

    #[test]
    fn mailto_link_targets_registration_address_with_encoded_parts() {
        let link = mailto_link(&RegistrationProfile::new(acme()));
        assert!(link.starts_with("mailto:hello@open-emr.org?subject=ONC%20registration&body="));
        assert!(link.contains("Organization%20Name%3A%20Acme%20Medical%20Center"));
        assert!(link.contains("%0A%0A"));
        assert!(!link.contains(' '));
        assert!(!link.contains('+'));
    }

    #[test]
    fn literal_plus_survives_encoding() {
        assert_eq!(percent_encode("a+b c"), "a%2Bb%20c");
    }

    #[test]
    fn only_unreserved_characters_pass_through() {
        assert_eq!(percent_encode("A-z_0.9~"), "A-z_0.9~");
        assert_eq!(percent_encode("*/:&=%"), "%2A%2F%3A%26%3D%25");
        assert_eq!(percent_encode("Zürich"), "Z%C3%BCrich");
    }

    #[test]
    fn complete_profile_has_nothing_missing() {
        let info = check_registration_info(&RegistrationProfile::new(acme()));
        assert!(info.complete);
        assert!(info.missing.is_empty());
    }

    #[test]
    fn empty_profile_reports_every_field_in_order() {
        let info = check_registration_info(&RegistrationProfile::new(InMemoryConfig::new()));
        assert!(!info.complete);
        assert_eq!(info.missing.len(), 4);
        assert!(info.missing[0].starts_with("Organization Name"));
        assert!(info.missing[1].starts_with("Organization Location"));
        assert!(info.missing[2].starts_with("Organization NPI"));
        assert!(info.missing[3].starts_with("FHIR Endpoint"));
    }

    #[test]
    fn only_missing_fields_are_listed() {
        let config = InMemoryConfig::new()
            .with(keys::ORG_NAME, "Acme")
            .with(keys::FHIR_ENDPOINT, "https://fhir.example.org/r4");
        let info = check_registration_info(&RegistrationProfile::new(config));
        assert!(!info.complete);
        assert_eq!(info.missing.len(), 2);
        assert!(info.missing[0].starts_with("Organization Location"));
        assert!(info.missing[1].starts_with("Organization NPI"));
    }
}
