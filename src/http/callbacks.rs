//! Requests against the interaction callback and `@original` endpoints.

use super::common::Endpoint;
use super::multipart::encode_body;
use super::transport::{RequestBody, Transport};
use crate::callback::CallbackData;
use crate::errors::InteractionError;
use crate::message::MessagePayload;
use crate::response::ApiResponse;
use reqwest::Method;
use tokio_util::sync::CancellationToken;

/// Sends `{type, data}` to `POST /interactions/{id}/{token}/callback`.
///
/// Message callbacks with files go out as multipart, everything else as JSON.
pub async fn create_callback(
    transport: &Transport,
    interaction_id: &str,
    token: &str,
    data: &CallbackData,
    cancel: Option<&CancellationToken>,
) -> Result<ApiResponse, InteractionError> {
    let endpoint = Endpoint::InteractionCallback {
        id: interaction_id,
        token,
    };
    let body = encode_body(&data.to_envelope(), data.attachments())?;
    transport.send(Method::POST, &endpoint, body, cancel).await
}

pub async fn get_original(
    transport: &Transport,
    application_id: &str,
    token: &str,
    cancel: Option<&CancellationToken>,
) -> Result<ApiResponse, InteractionError> {
    let endpoint = Endpoint::OriginalResponse {
        application_id,
        token,
    };
    transport
        .send(Method::GET, &endpoint, RequestBody::Empty, cancel)
        .await
}

/// Sends the bare message object (no `{type, data}` envelope) as a PATCH.
pub async fn edit_original(
    transport: &Transport,
    application_id: &str,
    token: &str,
    payload: &MessagePayload,
    cancel: Option<&CancellationToken>,
) -> Result<ApiResponse, InteractionError> {
    let endpoint = Endpoint::OriginalResponse {
        application_id,
        token,
    };
    let body = encode_body(&payload.to_body(), payload.files())?;
    transport.send(Method::PATCH, &endpoint, body, cancel).await
}

pub async fn delete_original(
    transport: &Transport,
    application_id: &str,
    token: &str,
    cancel: Option<&CancellationToken>,
) -> Result<ApiResponse, InteractionError> {
    let endpoint = Endpoint::OriginalResponse {
        application_id,
        token,
    };
    transport
        .send(Method::DELETE, &endpoint, RequestBody::Empty, cancel)
        .await
}
