//! # Integration Tests for the HTTP Page Fetcher
//!
//! Runs `HttpPageFetcher` and `RegistrationVerifier` against wiremock mock
//! servers to check request construction (user agent, timeout), status
//! handling, and end-to-end listing-page verification without network
//! access.
//!
//! ## Note on `spawn_blocking`
//!
//! The fetcher is synchronous and drives its own current-thread runtime.
//! That cannot be started or dropped from within a Tokio task, so every
//! fetcher is built, used, and dropped inside `spawn_blocking`.

use std::time::Duration;

use oncreg_core::config::keys;
use oncreg_core::{InMemoryConfig, SystemClock};
use oncreg_registry::verifier::USER_AGENT;
use oncreg_registry::{
    FetchError, HttpPageFetcher, PageFetcher, RegistrationVerifier, VerifierConfig,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_HTML: &str = r#"<html><body><table>
<tr><td>Acme Medical Center</td><td>https://emr.example.com/apis/default/fhir/r4/</td></tr>
<tr><td>Beta Clinic</td><td>https://beta.example.org/apis/default/fhir/r4</td></tr>
</table></body></html>"#;

fn fetch_blocking(
    url: String,
    timeout: Duration,
) -> tokio::task::JoinHandle<Result<Vec<u8>, FetchError>> {
    tokio::task::spawn_blocking(move || {
        let fetcher = HttpPageFetcher::new(USER_AGENT).expect("fetcher build");
        fetcher.fetch(&url, timeout)
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn fetch_returns_body_and_sends_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/listing"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let body = fetch_blocking(format!("{}/wiki/listing", server.uri()), Duration::from_secs(5))
        .await
        .expect("task")
        .expect("fetch");

    assert_eq!(String::from_utf8(body).unwrap(), LISTING_HTML);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/listing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such page"))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetch_blocking(format!("{}/wiki/listing", server.uri()), Duration::from_secs(5))
        .await
        .expect("task");

    match result {
        Err(FetchError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(LISTING_HTML)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let result = fetch_blocking(server.uri(), Duration::from_millis(200))
        .await
        .expect("task");

    assert!(
        matches!(result, Err(FetchError::Timeout { .. })),
        "expected timeout, got {result:?}"
    );
}

fn verifier_for(
    server_uri: &str,
    site_address: &str,
) -> RegistrationVerifier<InMemoryConfig, HttpPageFetcher, SystemClock> {
    let config = InMemoryConfig::new().with(keys::SITE_ADDRESS, site_address);
    let settings = VerifierConfig {
        listing_page_url: format!("{server_uri}/wiki/listing"),
        ..VerifierConfig::default()
    };
    let fetcher = HttpPageFetcher::new(&settings.user_agent).expect("fetcher build");
    RegistrationVerifier::with_config(config, fetcher, SystemClock, settings)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn verifier_finds_listed_endpoint_and_caches_it() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/listing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (first, second) = tokio::task::spawn_blocking(move || {
        let verifier = verifier_for(&uri, "https://emr.example.com/");
        (verifier.verify(), verifier.verify())
    })
    .await
    .expect("task");

    assert!(first.registered);
    assert_eq!(first.error, None);
    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn verifier_refetches_after_clear_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/listing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .expect(2)
        .mount(&server)
        .await;

    let uri = server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let verifier = verifier_for(&uri, "https://gamma.example.com");
        let first = verifier.verify();
        verifier.clear_cache();
        let second = verifier.verify();
        (first, second)
    })
    .await
    .expect("task");

    assert!(!result.0.registered);
    assert_eq!(result.0.error, None);
    assert_eq!(result.0, result.1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn verifier_reports_unreachable_listing_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/listing"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (first, second) = tokio::task::spawn_blocking(move || {
        let verifier = verifier_for(&uri, "https://emr.example.com");
        (verifier.verify(), verifier.verify())
    })
    .await
    .expect("task");

    assert!(!first.registered);
    assert_eq!(first.error.as_deref(), Some("Unable to fetch published URLs page"));
    // The failure is cached: the second call made no request.
    assert_eq!(first, second);
}
