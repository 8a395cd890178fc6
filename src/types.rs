//! Interaction identity shared by every callback and followup call.

use crate::errors::InteractionError;
use serde::{Deserialize, Serialize};

/// Identifies the interaction being responded to.
///
/// Deserializes straight from the interaction object the platform delivers;
/// every other field of that object is ignored.
///
/// - `id` + `token` address the single-use initial callback.
/// - `application_id` + `token` address the original response and followups
///   for as long as the token stays valid.
///
/// # Example
///
/// ```
/// use interactions_rs::Interaction;
///
/// let interaction: Interaction = serde_json::from_str(
///     r#"{"id":"123","token":"tok","application_id":"app","type":2,"data":{}}"#,
/// ).unwrap();
/// assert_eq!(interaction.id, "123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub token: String,
    pub application_id: String,
}

impl Interaction {
    pub fn new(
        id: impl Into<String>,
        token: impl Into<String>,
        application_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            token: token.into(),
            application_id: application_id.into(),
        }
    }

    /// Checks the fields used by the callback endpoint.
    pub(crate) fn require_callback_ids(&self) -> Result<(&str, &str), InteractionError> {
        Ok((
            require_non_empty("interaction id", &self.id)?,
            require_non_empty("interaction token", &self.token)?,
        ))
    }

    /// Checks the fields used by the webhook (original response and followup) endpoints.
    pub(crate) fn require_webhook_ids(&self) -> Result<(&str, &str), InteractionError> {
        Ok((
            require_non_empty("application_id", &self.application_id)?,
            require_non_empty("interaction token", &self.token)?,
        ))
    }
}

/// Rejects empty or whitespace-only path segments before they reach a URL.
pub(crate) fn require_non_empty<'a>(
    name: &str,
    value: &'a str,
) -> Result<&'a str, InteractionError> {
    if value.trim().is_empty() {
        Err(InteractionError::InvalidInput(format!(
            "{name} must not be empty"
        )))
    } else {
        Ok(value)
    }
}
