//! # oncreg-registry: FHIR Endpoint Registration
//!
//! Everything about the organization's *registration* with the certification
//! body: who the organization is, what its FHIR endpoint is, whether that
//! endpoint already appears on the published Service Base URLs page, and
//! how to submit it if it does not.
//!
//! ## Modules
//!
//! - [`profile`]: organization info and FHIR endpoint, read from the host
//!   configuration.
//! - [`fetch`]: the [`PageFetcher`] capability and its `reqwest`
//!   implementation.
//! - [`cache`]: single-entry TTL cache for verification outcomes.
//! - [`verifier`]: [`RegistrationVerifier`], which ties the above together.
//! - [`submission`]: completeness check, email body and `mailto:` link.
//!
//! ## Failure Model
//!
//! Nothing in [`RegistrationVerifier::verify`] returns an error. An
//! unconfigured endpoint or an unreachable listing page is reported in
//! [`VerificationResult::error`] and cached like a normal outcome, so an
//! outage does not turn into a request per page view.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod profile;
pub mod submission;
pub mod verifier;

pub use cache::{CachedVerification, VerificationCache};
pub use error::FetchError;
pub use fetch::{HttpPageFetcher, PageFetcher};
pub use profile::RegistrationProfile;
pub use submission::{
    check_registration_info, email_body, mailto_link, RegistrationInfo, REGISTRATION_EMAIL,
    REGISTRATION_SUBJECT,
};
pub use verifier::{
    derive_expected_endpoint, listing_page_url_for_version, RegistrationVerifier,
    VerificationResult, VerifierConfig, FHIR_API_SUFFIX,
};
