//! Requests against the followup webhook endpoints.

use super::common::Endpoint;
use super::multipart::encode_body;
use super::transport::{RequestBody, Transport};
use crate::errors::InteractionError;
use crate::message::MessagePayload;
use crate::response::ApiResponse;
use reqwest::Method;
use tokio_util::sync::CancellationToken;

/// `POST /webhooks/{application_id}/{token}` with the bare message object.
pub async fn create_followup(
    transport: &Transport,
    application_id: &str,
    token: &str,
    payload: &MessagePayload,
    cancel: Option<&CancellationToken>,
) -> Result<ApiResponse, InteractionError> {
    let endpoint = Endpoint::Followup {
        application_id,
        token,
    };
    let body = encode_body(&payload.to_body(), payload.files())?;
    transport.send(Method::POST, &endpoint, body, cancel).await
}

pub async fn edit_followup(
    transport: &Transport,
    application_id: &str,
    token: &str,
    message_id: &str,
    payload: &MessagePayload,
    cancel: Option<&CancellationToken>,
) -> Result<ApiResponse, InteractionError> {
    let endpoint = Endpoint::FollowupMessage {
        application_id,
        token,
        message_id,
    };
    let body = encode_body(&payload.to_body(), payload.files())?;
    transport.send(Method::PATCH, &endpoint, body, cancel).await
}

pub async fn get_followup(
    transport: &Transport,
    application_id: &str,
    token: &str,
    message_id: &str,
    cancel: Option<&CancellationToken>,
) -> Result<ApiResponse, InteractionError> {
    let endpoint = Endpoint::FollowupMessage {
        application_id,
        token,
        message_id,
    };
    transport
        .send(Method::GET, &endpoint, RequestBody::Empty, cancel)
        .await
}

pub async fn delete_followup(
    transport: &Transport,
    application_id: &str,
    token: &str,
    message_id: &str,
    cancel: Option<&CancellationToken>,
) -> Result<ApiResponse, InteractionError> {
    let endpoint = Endpoint::FollowupMessage {
        application_id,
        token,
        message_id,
    };
    transport
        .send(Method::DELETE, &endpoint, RequestBody::Empty, cancel)
        .await
}
