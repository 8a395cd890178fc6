//! Followup messages sent after the initial callback.
//!
//! Followups are addressed by `application_id` and `token` and stay available
//! for as long as the token is valid, unlike the single-use callback. They are
//! only accepted once the interaction has been acknowledged.

use crate::client::Client;
use crate::errors::InteractionError;
use crate::http::followups;
use crate::message::MessagePayload;
use crate::response::ApiResponse;
use crate::types::{Interaction, require_non_empty};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Followup operations, obtained from [`Client::followup`].
///
/// # Example
///
/// ```no_run
/// use interactions_rs::{Client, Interaction, MessagePayload};
///
/// # async fn example(client: Client, interaction: Interaction) -> Result<(), interactions_rs::InteractionError> {
/// let created = client
///     .followup()
///     .create(&interaction, MessagePayload::from("Working on it"))
///     .await?
///     .error_for_status()?;
///
/// if let Some(message_id) = created.message_id() {
///     client.followup().edit(&interaction, message_id, "Finished").await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Followups<'a> {
    client: &'a Client,
    cancel: Option<CancellationToken>,
}

impl<'a> Followups<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self {
            client,
            cancel: None,
        }
    }

    /// Abandons any request made through this handle once `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Sends a new followup message. Supports attachments, `username`, and `tts`.
    ///
    /// # Errors
    ///
    /// Returns an error if `application_id` or `token` is empty, the payload
    /// cannot be serialized, or the request fails in transport.
    pub async fn create(
        &self,
        interaction: &Interaction,
        payload: impl Into<MessagePayload>,
    ) -> Result<ApiResponse, InteractionError> {
        let (application_id, token) = interaction.require_webhook_ids()?;
        let payload = payload.into();
        debug!(
            "Creating followup: application={}, attachments={}",
            application_id,
            payload.files().len()
        );

        let response = followups::create_followup(
            &self.client.transport,
            application_id,
            token,
            &payload,
            self.cancel.as_ref(),
        )
        .await?;

        debug!(
            "Followup created: status={}, message_id={:?}",
            response.status_code(),
            response.message_id()
        );
        Ok(response)
    }

    /// Edits a followup message. Supports attachments.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::InvalidInput`] for an empty `message_id`
    /// before any request is made; otherwise as [`Followups::create`].
    pub async fn edit(
        &self,
        interaction: &Interaction,
        message_id: &str,
        payload: impl Into<MessagePayload>,
    ) -> Result<ApiResponse, InteractionError> {
        let (application_id, token) = interaction.require_webhook_ids()?;
        let message_id = require_non_empty("message_id", message_id)?;
        let payload = payload.into();
        debug!(
            "Editing followup: message={}, attachments={}",
            message_id,
            payload.files().len()
        );

        followups::edit_followup(
            &self.client.transport,
            application_id,
            token,
            message_id,
            &payload,
            self.cancel.as_ref(),
        )
        .await
    }

    /// Fetches a followup message.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::InvalidInput`] for an empty `message_id`
    /// before any request is made, or a transport error.
    pub async fn get(
        &self,
        interaction: &Interaction,
        message_id: &str,
    ) -> Result<ApiResponse, InteractionError> {
        let (application_id, token) = interaction.require_webhook_ids()?;
        let message_id = require_non_empty("message_id", message_id)?;
        debug!("Getting followup: message={}", message_id);

        followups::get_followup(
            &self.client.transport,
            application_id,
            token,
            message_id,
            self.cancel.as_ref(),
        )
        .await
    }

    /// Deletes a followup message.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::InvalidInput`] for an empty `message_id`
    /// before any request is made, or a transport error.
    pub async fn delete(
        &self,
        interaction: &Interaction,
        message_id: &str,
    ) -> Result<ApiResponse, InteractionError> {
        let (application_id, token) = interaction.require_webhook_ids()?;
        let message_id = require_non_empty("message_id", message_id)?;
        debug!("Deleting followup: message={}", message_id);

        followups::delete_followup(
            &self.client.transport,
            application_id,
            token,
            message_id,
            self.cancel.as_ref(),
        )
        .await
    }
}
