//! # Endpoint Registration Verifier
//!
//! Checks whether this installation's FHIR endpoint appears on the
//! published Service Base URLs page.
//!
//! ## Verification Logic
//!
//! 1. A cached outcome younger than the TTL (300 s) is returned as-is.
//!    No request is made, whatever the cached outcome was.
//! 2. No FHIR endpoint configured → "FHIR endpoint not configured".
//! 3. Listing page fetch fails → "Unable to fetch published URLs page".
//! 4. Otherwise `registered` is whether the page body contains the endpoint,
//!    with or without one trailing `/`. This is a raw substring scan.
//!
//! Every outcome from steps 2–4 is cached with the current time.
//!
//! ## Concurrency
//!
//! The cache mutex is held across check → fetch → store, so concurrent
//! `verify()` calls on one instance are serialized and a cache miss issues
//! exactly one fetch.

use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use oncreg_core::{Clock, ConfigurationSource};

use crate::cache::{CachedVerification, VerificationCache};
use crate::fetch::PageFetcher;
use crate::profile::RegistrationProfile;

/// Path appended to the site address to form the FHIR R4 base URL.
pub const FHIR_API_SUFFIX: &str = "/apis/default/fhir/r4";

/// Host version whose listing page is checked by default.
pub const DEFAULT_HOST_VERSION: &str = "7.0.2";

/// How long a verification outcome is reused.
pub const CACHE_TTL_SECS: i64 = 300;

/// Upper bound on the listing page request.
pub const FETCH_TIMEOUT_SECS: u64 = 10;

/// User agent sent with the listing page request.
pub const USER_AGENT: &str = "OpenEMR ONC Registration Module";

const ENDPOINT_NOT_CONFIGURED: &str = "FHIR endpoint not configured";
const LISTING_UNAVAILABLE: &str = "Unable to fetch published URLs page";

/// Outcome of a registration check.
///
/// `error` is set only when the status could not be determined. A
/// definite "not listed" is `registered: false` with no error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub registered: bool,
    pub error: Option<String>,
}

impl VerificationResult {
    /// A determined outcome.
    pub fn registered(registered: bool) -> Self {
        Self {
            registered,
            error: None,
        }
    }

    /// Status could not be determined.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            registered: false,
            error: Some(reason.into()),
        }
    }
}

/// FHIR base URL for a site address.
///
/// Empty input yields the empty string. Trailing slashes are trimmed before
/// [`FHIR_API_SUFFIX`] is appended, so `https://x.test` and
/// `https://x.test/` give the same endpoint.
pub fn derive_expected_endpoint(site_base_url: &str) -> String {
    if site_base_url.is_empty() {
        return String::new();
    }
    format!("{}{FHIR_API_SUFFIX}", site_base_url.trim_end_matches('/'))
}

/// URL of the published Service Base URLs page for a host version.
pub fn listing_page_url_for_version(version: &str) -> String {
    format!("https://www.open-emr.org/wiki/index.php/OpenEMR_{version}_API_Service_Base_URLs")
}

/// Tunables for [`RegistrationVerifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Page listing registered endpoints.
    pub listing_page_url: String,
    /// How long an outcome is reused.
    pub cache_ttl: chrono::Duration,
    /// Upper bound on the listing page request.
    pub fetch_timeout: Duration,
    /// Client label for the listing page request.
    pub user_agent: String,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            listing_page_url: listing_page_url_for_version(DEFAULT_HOST_VERSION),
            cache_ttl: chrono::Duration::seconds(CACHE_TTL_SECS),
            fetch_timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Verifies that the FHIR endpoint is listed on the published page.
pub struct RegistrationVerifier<C, F, K> {
    config: C,
    fetcher: F,
    clock: K,
    settings: VerifierConfig,
    cache: Mutex<VerificationCache>,
}

impl<C, F, K> std::fmt::Debug for RegistrationVerifier<C, F, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationVerifier")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<C, F, K> RegistrationVerifier<C, F, K>
where
    C: ConfigurationSource,
    F: PageFetcher,
    K: Clock,
{
    /// Create a verifier with default settings.
    pub fn new(config: C, fetcher: F, clock: K) -> Self {
        Self::with_config(config, fetcher, clock, VerifierConfig::default())
    }

    /// Create a verifier with explicit settings.
    pub fn with_config(config: C, fetcher: F, clock: K, settings: VerifierConfig) -> Self {
        let cache = VerificationCache::new(settings.cache_ttl);
        Self {
            config,
            fetcher,
            clock,
            settings,
            cache: Mutex::new(cache),
        }
    }

    /// URL of the page scanned for the endpoint.
    pub fn listing_page_url(&self) -> &str {
        &self.settings.listing_page_url
    }

    /// The endpoint that must appear on the listing page.
    pub fn expected_endpoint(&self) -> String {
        RegistrationProfile::new(&self.config).fhir_endpoint()
    }

    /// Check registration, reusing a fresh cached outcome.
    pub fn verify(&self) -> VerificationResult {
        let mut cache = self.cache.lock();

        if let Some(hit) = cache.get_fresh(self.clock.now()) {
            tracing::debug!(
                registered = hit.registered,
                error = hit.error.as_deref(),
                "using cached registration status"
            );
            return hit.clone();
        }

        let result = self.check_listing();
        cache.store(result.clone(), self.clock.now());
        result
    }

    /// Force the next [`verify`](Self::verify) to fetch again.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    /// The stored outcome, fresh or not.
    pub fn cached(&self) -> Option<CachedVerification> {
        self.cache.lock().peek().cloned()
    }

    fn check_listing(&self) -> VerificationResult {
        let endpoint = self.expected_endpoint();
        if endpoint.is_empty() {
            return VerificationResult::unavailable(ENDPOINT_NOT_CONFIGURED);
        }

        let url = self.listing_page_url();
        let body = match self.fetcher.fetch(url, self.settings.fetch_timeout) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to fetch published URLs page");
                return VerificationResult::unavailable(LISTING_UNAVAILABLE);
            }
        };

        let page = String::from_utf8_lossy(&body);
        let normalized = endpoint.trim_end_matches('/');
        let listed =
            page.contains(normalized) || page.contains(format!("{normalized}/").as_str());

        tracing::info!(endpoint = normalized, registered = listed, "checked published URLs page");
        VerificationResult::registered(listed)
    }
}
