//! Common test utilities shared across all integration test files.
//!
//! Usage in test files:
//! ```ignore
//! mod common;
//! use common::*;
//! ```

use interactions_rs::{Client, Interaction};
use std::future::Future;
use std::time::Duration;
use wiremock::MockServer;

// =============================================================================
// Fixtures
// =============================================================================

/// Interaction id used by every fixture.
#[allow(dead_code)]
pub const INTERACTION_ID: &str = "123";

/// Interaction token used by every fixture.
#[allow(dead_code)]
pub const TOKEN: &str = "tok";

/// Application id used by every fixture.
#[allow(dead_code)]
pub const APPLICATION_ID: &str = "app";

/// An interaction addressed by the fixture ids.
#[allow(dead_code)]
pub fn interaction() -> Interaction {
    Interaction::new(INTERACTION_ID, TOKEN, APPLICATION_ID)
}

/// A client pointed at the mock server.
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> Client {
    client_for_url(&server.uri())
}

/// A client pointed at an arbitrary base URL, with a short timeout so
/// stalled-server tests finish quickly.
#[allow(dead_code)]
pub fn client_for_url(base_url: &str) -> Client {
    Client::builder()
        .base_url(base_url)
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client should build")
}

// =============================================================================
// Timeout Utilities
// =============================================================================

/// Upper bound for any single test against a local server.
#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Wraps a future with a timeout, panicking if the timeout is exceeded.
///
/// # Panics
///
/// Panics with a descriptive message if the timeout is exceeded.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, future)
        .await
        .unwrap_or_else(|_| panic!("Test timed out after {:?}", duration))
}

// =============================================================================
// Request Inspection
// =============================================================================

/// The only request the server received.
///
/// # Panics
///
/// Panics unless exactly one request was received.
#[allow(dead_code)]
pub async fn single_request(server: &MockServer) -> wiremock::Request {
    let mut requests = server
        .received_requests()
        .await
        .expect("request recording is enabled");
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.remove(0)
}

/// The `Content-Type` header of a received request.
#[allow(dead_code)]
pub fn content_type(request: &wiremock::Request) -> String {
    request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
