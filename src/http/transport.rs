//! The single request path every operation goes through.

use super::common::{Endpoint, construct_endpoint_path};
use super::loud_wire;
use super::multipart::MultipartBody;
use crate::errors::InteractionError;
use crate::response::{ApiResponse, normalize};
use bytes::Bytes;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};
use reqwest::{Client as ReqwestClient, Method};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// No body. The only valid body for GET and DELETE.
    Empty,
    /// Serialized JSON.
    Json(Vec<u8>),
    /// Files plus a `payload_json` part.
    Multipart(MultipartBody),
}

impl RequestBody {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A response as received: status, headers, and the full body.
///
/// `body` holds the bytes exactly as they arrived, including bodies that are
/// not valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status_code: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    /// The body as text. Invalid UTF-8 sequences are replaced with U+FFFD.
    #[must_use]
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Issues requests against one fixed host.
///
/// The wrapped `reqwest::Client` owns the connection pool; cloning a
/// `Transport` shares it.
#[derive(Debug, Clone)]
pub struct Transport {
    http_client: ReqwestClient,
    base_url: String,
    timeout: Duration,
    connect_timeout: Option<Duration>,
}

impl Transport {
    /// `timeout` and `connect_timeout` must be the ones the client was built
    /// with; they are reported back in [`InteractionError::Timeout`].
    pub(crate) fn new(
        http_client: ReqwestClient,
        base_url: String,
        timeout: Duration,
        connect_timeout: Option<Duration>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            connect_timeout,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// The limit that expired: the connect timeout when the connection was
    /// never established and one is configured, the total timeout otherwise.
    fn elapsed_limit(&self, during_connect: bool) -> Duration {
        match self.connect_timeout {
            Some(connect_timeout) if during_connect => connect_timeout,
            _ => self.timeout,
        }
    }

    /// Sends a request to `endpoint` and normalizes the response.
    ///
    /// # Errors
    ///
    /// See [`Transport::request`].
    pub async fn send(
        &self,
        method: Method,
        endpoint: &Endpoint<'_>,
        body: RequestBody,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse, InteractionError> {
        debug!("{} {}", method, endpoint.kind());
        let raw = self
            .request(method, &construct_endpoint_path(endpoint), body, cancel)
            .await?;
        Ok(normalize(raw))
    }

    /// Sends one request and reads the whole response body.
    ///
    /// - GET and DELETE must use [`RequestBody::Empty`] and are sent without
    ///   `Content-Length`.
    /// - JSON bodies carry `Content-Type: application/json` and a
    ///   `Content-Length` equal to their encoded byte length.
    /// - Multipart bodies carry the form's boundary content type; every part
    ///   has a known size, so the length is set as well.
    ///
    /// No redirects are followed and nothing is retried. If `cancel` fires
    /// before the response is complete, the request is dropped.
    ///
    /// # Errors
    ///
    /// - [`InteractionError::InvalidInput`] for a body on GET/DELETE
    /// - [`InteractionError::Timeout`] when the configured timeout elapses
    /// - [`InteractionError::Cancelled`] when `cancel` fires
    /// - [`InteractionError::Transport`] for any other socket or TLS failure
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        cancel: Option<&CancellationToken>,
    ) -> Result<RawResponse, InteractionError> {
        let bodyless = method == Method::GET || method == Method::DELETE;
        if bodyless && !body.is_empty() {
            return Err(InteractionError::InvalidInput(format!(
                "{method} requests cannot carry a body"
            )));
        }

        let url = format!("{}{}", self.base_url, path);
        let request_id = loud_wire::next_request_id();
        let mut builder = self.http_client.request(method.clone(), &url);

        match body {
            RequestBody::Empty => {
                loud_wire::log_request(request_id, method.as_str(), &url, None);
            }
            RequestBody::Json(bytes) => {
                loud_wire::log_request(
                    request_id,
                    method.as_str(),
                    &url,
                    std::str::from_utf8(&bytes).ok(),
                );
                builder = builder
                    .header(CONTENT_TYPE, "application/json")
                    .header(CONTENT_LENGTH, bytes.len())
                    .body(bytes);
            }
            RequestBody::Multipart(multipart) => {
                loud_wire::log_request(
                    request_id,
                    &format!("{method} (multipart)"),
                    &url,
                    Some(&multipart.payload_json),
                );
                for file in &multipart.files {
                    loud_wire::log_file_part(request_id, &file.name, &file.filename, file.data.len());
                }
                builder = builder.multipart(multipart.into_form());
            }
        }

        let exchange = async {
            let response = builder.send().await?;
            let status_code = response.status().as_u16();
            loud_wire::log_response_status(request_id, status_code);
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(RawResponse {
                status_code,
                headers,
                body,
            })
        };

        let result = match cancel {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!("{} request #{} cancelled", method, request_id);
                    return Err(InteractionError::Cancelled);
                }
                result = exchange => result,
            },
            None => exchange.await,
        };

        match result {
            Ok(raw) => {
                loud_wire::log_response_body(request_id, &raw.text());
                debug!(
                    "{} request #{} completed: status={}, body_len={}",
                    method,
                    request_id,
                    raw.status_code,
                    raw.body.len()
                );
                Ok(raw)
            }
            Err(e) if e.is_timeout() => {
                let limit = self.elapsed_limit(e.is_connect());
                warn!(
                    "{} request #{} timed out after {:?}",
                    method, request_id, limit
                );
                Err(InteractionError::Timeout(limit))
            }
            Err(e) => {
                // The URL carries the interaction token.
                let e = e.without_url();
                warn!("{} request #{} failed: {}", method, request_id, e);
                Err(InteractionError::Transport(e))
            }
        }
    }
}
