//! The initial response to an interaction and the message it creates.
//!
//! # Lifecycle
//!
//! An interaction starts out pending. Exactly one callback (any of the six
//! types below) may succeed for it; the platform rejects a second one for the
//! same `id`/`token`. Once acknowledged, the original response can be fetched,
//! edited, or deleted through `@original`, and followups can be sent. Before
//! that, those calls fail remotely (unknown message). This crate keeps no
//! state, so it neither enforces nor tracks any of this; sequencing is the
//! caller's job.
//!
//! # Example
//!
//! ```no_run
//! use interactions_rs::{Client, DeferOptions, Interaction};
//!
//! # async fn example(interaction: Interaction) -> Result<(), interactions_rs::InteractionError> {
//! let client = Client::new()?;
//!
//! client.callback().defer(&interaction, DeferOptions::ephemeral()).await?;
//! // ... slow work ...
//! client
//!     .callback()
//!     .edit_original(&interaction, "Done!")
//!     .await?
//!     .error_for_status()?;
//! # Ok(())
//! # }
//! ```

use crate::client::Client;
use crate::errors::InteractionError;
use crate::http::callbacks;
use crate::message::{Attachment, MessageBody, MessagePayload, message_flags, strict_true};
use crate::response::ApiResponse;
use crate::types::Interaction;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Interaction callback discriminant, serialized as a bare integer.
#[derive(Serialize_repr, Deserialize_repr, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CallbackType {
    ChannelMessageWithSource = 4,
    DeferredChannelMessageWithSource = 5,
    /// Components only
    DeferredUpdateMessage = 6,
    /// Components only
    UpdateMessage = 7,
    ApplicationCommandAutocompleteResult = 8,
    Modal = 9,
}

/// Options for the two deferral callbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DeferOptions {
    /// Only the JSON literal `true` enables this when deserializing.
    #[serde(default, deserialize_with = "strict_true")]
    pub ephemeral: bool,
}

impl DeferOptions {
    /// Defers with a response only the invoking user will see.
    #[must_use]
    pub const fn ephemeral() -> Self {
        Self { ephemeral: true }
    }

    #[must_use]
    pub const fn flags(&self) -> u64 {
        message_flags(self.ephemeral)
    }
}

/// One suggestion in an autocomplete result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteChoice {
    pub name: String,
    /// String, integer, or number, matching the option being completed
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_localizations: Option<BTreeMap<String, String>>,
}

impl AutocompleteChoice {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            name_localizations: None,
        }
    }
}

/// A popup form shown in response to an interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modal {
    pub custom_id: String,
    pub title: String,
    pub components: Vec<Value>,
}

impl Modal {
    pub fn new(custom_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            title: title.into(),
            components: Vec::new(),
        }
    }

    /// Appends one component (usually an action row holding a text input).
    #[must_use]
    pub fn with_component(mut self, component: Value) -> Self {
        self.components.push(component);
        self
    }
}

/// The `data` of a callback, one variant per callback type.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackData {
    /// Type 4: reply with a message.
    ChannelMessage(MessagePayload),
    /// Type 5: acknowledge now, show a loading state, follow up later.
    DeferredChannelMessage(DeferOptions),
    /// Type 6: acknowledge a component interaction without a loading state.
    DeferredUpdate(DeferOptions),
    /// Type 7: edit the message the component is attached to.
    UpdateMessage(MessagePayload),
    /// Type 8: suggest autocomplete choices.
    Autocomplete(Vec<AutocompleteChoice>),
    /// Type 9: open a modal.
    Modal(Modal),
}

impl CallbackData {
    #[must_use]
    pub const fn callback_type(&self) -> CallbackType {
        match self {
            Self::ChannelMessage(_) => CallbackType::ChannelMessageWithSource,
            Self::DeferredChannelMessage(_) => CallbackType::DeferredChannelMessageWithSource,
            Self::DeferredUpdate(_) => CallbackType::DeferredUpdateMessage,
            Self::UpdateMessage(_) => CallbackType::UpdateMessage,
            Self::Autocomplete(_) => CallbackType::ApplicationCommandAutocompleteResult,
            Self::Modal(_) => CallbackType::Modal,
        }
    }

    /// Files to upload. Only the two message variants carry any.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        match self {
            Self::ChannelMessage(payload) | Self::UpdateMessage(payload) => payload.files(),
            _ => &[],
        }
    }

    pub(crate) fn to_envelope(&self) -> CallbackEnvelope<'_> {
        let data = match self {
            Self::ChannelMessage(payload) | Self::UpdateMessage(payload) => {
                CallbackBody::Message(payload.to_body())
            }
            Self::DeferredChannelMessage(options) | Self::DeferredUpdate(options) => {
                CallbackBody::Flags {
                    flags: options.flags(),
                }
            }
            Self::Autocomplete(choices) => CallbackBody::Choices { choices },
            Self::Modal(modal) => CallbackBody::Modal(modal),
        };
        CallbackEnvelope {
            kind: self.callback_type(),
            data,
        }
    }
}

/// `{"type": <int>, "data": {...}}`
#[derive(Debug, Serialize)]
pub(crate) struct CallbackEnvelope<'a> {
    #[serde(rename = "type")]
    kind: CallbackType,
    data: CallbackBody<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum CallbackBody<'a> {
    Message(MessageBody<'a>),
    Flags { flags: u64 },
    Choices { choices: &'a [AutocompleteChoice] },
    Modal(&'a Modal),
}

/// Callback operations, obtained from [`Client::callback`].
#[derive(Debug, Clone)]
pub struct Callbacks<'a> {
    client: &'a Client,
    cancel: Option<CancellationToken>,
}

impl<'a> Callbacks<'a> {
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

    /// Sends any callback type.
    ///
    /// # Errors
    ///
    /// Returns an error if the interaction's `id` or `token` is empty, the
    /// payload cannot be serialized, or the request fails in transport.
    pub async fn send(
        &self,
        interaction: &Interaction,
        data: CallbackData,
    ) -> Result<ApiResponse, InteractionError> {
        let (id, token) = interaction.require_callback_ids()?;
        debug!(
            "Sending callback: type={:?}, interaction={}, attachments={}",
            data.callback_type(),
            id,
            data.attachments().len()
        );

        let response = callbacks::create_callback(
            &self.client.transport,
            id,
            token,
            &data,
            self.cancel.as_ref(),
        )
        .await?;

        debug!("Callback answered: status={}", response.status_code());
        Ok(response)
    }

    /// Replies to the interaction with a message (type 4). Supports attachments.
    ///
    /// # Errors
    ///
    /// See [`Callbacks::send`].
    pub async fn reply(
        &self,
        interaction: &Interaction,
        payload: impl Into<MessagePayload>,
    ) -> Result<ApiResponse, InteractionError> {
        self.send(interaction, CallbackData::ChannelMessage(payload.into()))
            .await
    }

    /// Acknowledges now and shows a loading state (type 5). Follow up with
    /// [`Callbacks::edit_original`] or a followup message.
    ///
    /// # Errors
    ///
    /// See [`Callbacks::send`].
    pub async fn defer(
        &self,
        interaction: &Interaction,
        options: DeferOptions,
    ) -> Result<ApiResponse, InteractionError> {
        self.send(interaction, CallbackData::DeferredChannelMessage(options))
            .await
    }

    /// Acknowledges a component interaction without a loading state (type 6).
    ///
    /// # Errors
    ///
    /// See [`Callbacks::send`].
    pub async fn component_defer(
        &self,
        interaction: &Interaction,
        options: DeferOptions,
    ) -> Result<ApiResponse, InteractionError> {
        self.send(interaction, CallbackData::DeferredUpdate(options))
            .await
    }

    /// Edits the message a component belongs to (type 7). Supports attachments.
    ///
    /// # Errors
    ///
    /// See [`Callbacks::send`].
    pub async fn component_update(
        &self,
        interaction: &Interaction,
        payload: impl Into<MessagePayload>,
    ) -> Result<ApiResponse, InteractionError> {
        self.send(interaction, CallbackData::UpdateMessage(payload.into()))
            .await
    }

    /// Answers an autocomplete interaction with suggestions (type 8).
    ///
    /// # Errors
    ///
    /// See [`Callbacks::send`].
    pub async fn autocomplete_reply(
        &self,
        interaction: &Interaction,
        choices: Vec<AutocompleteChoice>,
    ) -> Result<ApiResponse, InteractionError> {
        self.send(interaction, CallbackData::Autocomplete(choices))
            .await
    }

    /// Opens a modal (type 9).
    ///
    /// # Errors
    ///
    /// See [`Callbacks::send`].
    pub async fn modal_reply(
        &self,
        interaction: &Interaction,
        modal: Modal,
    ) -> Result<ApiResponse, InteractionError> {
        self.send(interaction, CallbackData::Modal(modal)).await
    }

    /// Fetches the message created by the callback.
    ///
    /// # Errors
    ///
    /// Returns an error if `application_id` or `token` is empty or the
    /// request fails in transport.
    pub async fn get_original(
        &self,
        interaction: &Interaction,
    ) -> Result<ApiResponse, InteractionError> {
        let (application_id, token) = interaction.require_webhook_ids()?;
        debug!("Getting original response: application={}", application_id);

        callbacks::get_original(
            &self.client.transport,
            application_id,
            token,
            self.cancel.as_ref(),
        )
        .await
    }

    /// Edits the message created by the callback. Supports attachments.
    ///
    /// # Errors
    ///
    /// Returns an error if `application_id` or `token` is empty, the payload
    /// cannot be serialized, or the request fails in transport.
    pub async fn edit_original(
        &self,
        interaction: &Interaction,
        payload: impl Into<MessagePayload>,
    ) -> Result<ApiResponse, InteractionError> {
        let (application_id, token) = interaction.require_webhook_ids()?;
        let payload = payload.into();
        debug!(
            "Editing original response: application={}, attachments={}",
            application_id,
            payload.files().len()
        );

        callbacks::edit_original(
            &self.client.transport,
            application_id,
            token,
            &payload,
            self.cancel.as_ref(),
        )
        .await
    }

    /// Deletes the message created by the callback.
    ///
    /// # Errors
    ///
    /// Returns an error if `application_id` or `token` is empty or the
    /// request fails in transport.
    pub async fn delete_original(
        &self,
        interaction: &Interaction,
    ) -> Result<ApiResponse, InteractionError> {
        let (application_id, token) = interaction.require_webhook_ids()?;
        debug!("Deleting original response: application={}", application_id);

        callbacks::delete_original(
            &self.client.transport,
            application_id,
            token,
            self.cancel.as_ref(),
        )
        .await
    }
}
