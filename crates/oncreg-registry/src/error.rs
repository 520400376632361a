//! Listing-page fetch errors.

/// Errors from fetching a remote page.
///
/// The verifier never surfaces these to its callers; it logs them and
/// folds them into a cached "unable to fetch" outcome.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP client or its runtime could not be built.
    #[error("failed to build HTTP client: {reason}")]
    Client { reason: String },

    /// Connection, TLS, or protocol failure.
    #[error("HTTP error fetching {url}: {reason}")]
    Transport { url: String, reason: String },

    /// The request did not complete within the timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body could not be read.
    #[error("failed to read response body from {url}: {reason}")]
    Body { url: String, reason: String },
}
