//! # Page Fetching
//!
//! [`PageFetcher`] is the one outbound capability the verifier needs: GET a
//! URL and hand back the body. [`HttpPageFetcher`] implements it with
//! `reqwest`.
//!
//! ## Blocking Model
//!
//! The verifier API is synchronous. `HttpPageFetcher` owns a current-thread
//! Tokio runtime and blocks on each request, so it can be called from plain
//! threads without an ambient runtime. It must not be called (or dropped)
//! from inside an async task; wrap calls in `spawn_blocking` there.
//!
//! ## Timeout & Retry
//!
//! The timeout is per request and supplied by the caller. There is no
//! retry: one call is one GET.

use std::sync::Arc;
use std::time::Duration;

use crate::error::FetchError;

/// Fetches a remote document.
pub trait PageFetcher: Send + Sync {
    /// GET `url` and return the response body.
    ///
    /// Non-2xx responses are errors.
    fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url, timeout)
    }
}

impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url, timeout)
    }
}

/// `reqwest`-backed [`PageFetcher`].
#[derive(Debug)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl HttpPageFetcher {
    /// Build a fetcher that identifies itself with `user_agent`.
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Client {
                reason: e.to_string(),
            })?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| FetchError::Client {
                reason: format!("failed to start runtime: {e}"),
            })?;

        Ok(Self { client, runtime })
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        self.runtime.block_on(async {
            let resp = self
                .client
                .get(url)
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        FetchError::Timeout {
                            url: url.to_string(),
                            timeout_secs: timeout.as_secs(),
                        }
                    } else {
                        FetchError::Transport {
                            url: url.to_string(),
                            reason: e.to_string(),
                        }
                    }
                })?;

            let status = resp.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            let body = resp.bytes().await.map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                        timeout_secs: timeout.as_secs(),
                    }
                } else {
                    FetchError::Body {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

            Ok(body.to_vec())
        })
    }
}
