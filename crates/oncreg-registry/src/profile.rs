//! # Registration Profile
//!
//! Typed view over the module's configuration keys
//! ([`oncreg_core::config::keys`]): the organization's name, location and
//! NPI, its FHIR endpoint, and the host-recorded registration status.
//!
//! The FHIR endpoint is the explicitly configured value when one is set,
//! otherwise it is derived from the host's `site_addr_oath` setting.

use oncreg_core::config::keys;
use oncreg_core::ConfigurationSource;

use crate::verifier::derive_expected_endpoint;

/// Organization registration info read from a configuration source.
#[derive(Debug, Clone)]
pub struct RegistrationProfile<C> {
    config: C,
}

impl<C: ConfigurationSource> RegistrationProfile<C> {
    pub fn new(config: C) -> Self {
        Self { config }
    }

    /// Whether the registration helper is enabled. Defaults to off.
    pub fn is_enabled(&self) -> bool {
        self.config.get_boolean(keys::ENABLED, false)
    }

    /// Whether name, NPI and FHIR endpoint are all known.
    pub fn is_configured(&self) -> bool {
        !self.org_name().is_empty()
            && !self.org_npi().is_empty()
            && !self.fhir_endpoint().is_empty()
    }

    pub fn org_name(&self) -> String {
        self.config.get_string(keys::ORG_NAME, "")
    }

    pub fn org_location(&self) -> String {
        self.config.get_string(keys::ORG_LOCATION, "")
    }

    pub fn org_npi(&self) -> String {
        self.config.get_string(keys::ORG_NPI, "")
    }

    /// The configured FHIR endpoint, falling back to the detected one.
    pub fn fhir_endpoint(&self) -> String {
        let configured = self.config.get_string(keys::FHIR_ENDPOINT, "");
        if !configured.is_empty() {
            return configured;
        }
        self.detected_fhir_endpoint()
    }

    /// FHIR endpoint derived from the host's public site address.
    pub fn detected_fhir_endpoint(&self) -> String {
        derive_expected_endpoint(&self.config.get_string(keys::SITE_ADDRESS, ""))
    }

    pub fn registration_date(&self) -> String {
        self.config.get_string(keys::REGISTRATION_DATE, "")
    }

    pub fn registration_status(&self) -> String {
        self.config.get_string(keys::REGISTRATION_STATUS, "")
    }
}
