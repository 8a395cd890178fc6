use crate::response::ApiError;
use std::time::Duration;
use thiserror::Error;

/// Defines errors that can occur when responding to an interaction.
///
/// Only failures that prevent a usable answer from the platform end up here.
/// Validation errors reported by the platform (a JSON body with an `errors`
/// key) and non-JSON bodies are returned as values inside
/// [`ApiResponse`](crate::ApiResponse) instead, so callers can branch on the
/// response shape without error handling. Use
/// [`ApiResponse::error_for_status`](crate::ApiResponse::error_for_status) to
/// turn those into an `InteractionError`.
///
/// # Example: Handling Transport Errors
///
/// ```ignore
/// match client.callback().defer(&interaction, DeferOptions::ephemeral()).await {
///     Ok(response) if response.is_success() => {}
///     Ok(response) => tracing::warn!("platform rejected defer: {:?}", response),
///     Err(InteractionError::Timeout(after)) => tracing::error!("gave up after {after:?}"),
///     Err(e) => tracing::error!("defer failed: {e}"),
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InteractionError {
    /// Connection refused or reset, TLS failure, or another socket-level error.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The request exceeded the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// The request was abandoned through its cancellation token.
    #[error("Request cancelled")]
    Cancelled,
    /// A precondition on the caller's input failed before any network call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read attachment: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to build the HTTP client.
    ///
    /// This typically only occurs in exceptional circumstances such as
    /// TLS backend initialization failures.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
    /// The platform rejected the request with a structured validation error.
    #[error("API error (HTTP {}): {}", .0.status_code, .0.message)]
    Api(ApiError),
    /// The platform answered with a non-success status and a body that is not
    /// JSON, e.g. an HTML error page from a gateway.
    #[error("Unexpected response (HTTP {status_code}): {body}")]
    UnexpectedResponse {
        /// HTTP status code of the response
        status_code: u16,
        /// Body preview, truncated
        body: String,
    },
    /// A success body did not match the type it was parsed into.
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),
}

impl InteractionError {
    /// Returns `true` if the request never produced a response from the
    /// platform (transport failure, timeout, or cancellation).
    ///
    /// Such a call may or may not have reached the platform. Callbacks are
    /// single-use, so re-sending one after a transport error can be rejected
    /// if the first attempt did arrive.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            InteractionError::Transport(_)
                | InteractionError::Timeout(_)
                | InteractionError::Cancelled
        )
    }
}
