//! Response normalization.
//!
//! Every operation returns an [`ApiResponse`] built by [`normalize`] from the
//! raw HTTP exchange:
//!
//! | Raw body | Result |
//! |---|---|
//! | empty (e.g. 204 from a defer or delete) | [`ApiResponse::Empty`] |
//! | not JSON (HTML error page, gateway failure, non-UTF-8 bytes) | [`ApiResponse::Raw`], byte for byte |
//! | JSON with an `errors` key | [`ApiResponse::Error`] |
//! | any other JSON | [`ApiResponse::Json`] |
//!
//! None of these are errors in the `Result` sense. Call
//! [`ApiResponse::error_for_status`] to treat platform rejections as errors.

use crate::errors::InteractionError;
use crate::http::error_helpers::{
    ERROR_BODY_PREVIEW_LENGTH, deserialize_with_context, truncate_for_context,
};
use crate::http::transport::RawResponse;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

/// A validation error reported by the platform.
///
/// The platform nests a list of error descriptors under each offending field
/// (`{"content": {"_errors": [{"code": ..., "message": ...}, ...]}}`).
/// `details` keeps only the first descriptor per top-level field. Later
/// descriptors are dropped on purpose; consumers match on the first one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiError {
    pub status_code: u16,
    /// Platform error code, e.g. `50035` for an invalid form body
    pub code: Option<i64>,
    pub message: String,
    /// First error descriptor per field
    pub details: BTreeMap<String, Value>,
}

/// Normalized result of one request.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum ApiResponse {
    /// The response had no body.
    Empty { status_code: u16 },
    /// The response body was JSON without an `errors` key.
    Json { status_code: u16, body: Value },
    /// The response body was a platform validation error.
    Error(ApiError),
    /// The response body was not JSON; passed through untouched.
    Raw(RawResponse),
}

impl ApiResponse {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Empty { status_code } | Self::Json { status_code, .. } => *status_code,
            Self::Error(error) => error.status_code,
            Self::Raw(raw) => raw.status_code,
        }
    }

    /// `true` for a 2xx status that is not a validation error.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Error(_)) && (200..300).contains(&self.status_code())
    }

    /// The JSON body, if the response had one.
    pub fn json(&self) -> Option<&Value> {
        match self {
            Self::Json { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    /// The `id` of the message in the body, e.g. a followup just created.
    pub fn message_id(&self) -> Option<&str> {
        self.json()?.get("id")?.as_str()
    }

    /// Deserializes the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::MalformedResponse`] if there is no JSON body
    /// or it does not match `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, InteractionError> {
        match self {
            Self::Json { body, .. } => {
                deserialize_with_context(body, std::any::type_name::<T>())
            }
            other => Err(InteractionError::MalformedResponse(format!(
                "expected a JSON body, got HTTP {} without one",
                other.status_code()
            ))),
        }
    }

    /// Turns platform rejections into errors, passing successes through.
    ///
    /// # Errors
    ///
    /// - [`InteractionError::Api`] for a validation error
    /// - [`InteractionError::UnexpectedResponse`] for any other non-2xx status
    pub fn error_for_status(self) -> Result<Self, InteractionError> {
        if self.is_success() {
            return Ok(self);
        }
        let status_code = self.status_code();
        match self {
            Self::Error(error) => Err(InteractionError::Api(error)),
            Self::Raw(raw) => Err(InteractionError::UnexpectedResponse {
                status_code,
                body: truncate_for_context(&raw.text(), ERROR_BODY_PREVIEW_LENGTH),
            }),
            Self::Json { body, .. } => Err(InteractionError::UnexpectedResponse {
                status_code,
                body: truncate_for_context(&body.to_string(), ERROR_BODY_PREVIEW_LENGTH),
            }),
            Self::Empty { .. } => Err(InteractionError::UnexpectedResponse {
                status_code,
                body: String::new(),
            }),
        }
    }
}

/// Converts a raw response into an [`ApiResponse`].
pub fn normalize(raw: RawResponse) -> ApiResponse {
    if raw.body.is_empty() {
        return ApiResponse::Empty {
            status_code: raw.status_code,
        };
    }

    let parsed: Value = match serde_json::from_slice(&raw.body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(
                "Response body is not JSON (HTTP {}): {}",
                raw.status_code,
                e
            );
            return ApiResponse::Raw(raw);
        }
    };

    match parsed.get("errors") {
        Some(errors) => ApiResponse::Error(ApiError {
            status_code: raw.status_code,
            code: parsed.get("code").and_then(Value::as_i64),
            message: parsed
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            details: flatten_errors(errors),
        }),
        None => ApiResponse::Json {
            status_code: raw.status_code,
            body: parsed,
        },
    }
}

/// Keeps the first error descriptor under each top-level field.
fn flatten_errors(errors: &Value) -> BTreeMap<String, Value> {
    let Some(fields) = errors.as_object() else {
        return BTreeMap::new();
    };
    fields
        .iter()
        .map(|(field, nested)| {
            let detail = first_error(nested).unwrap_or_else(|| nested.clone());
            (field.clone(), detail)
        })
        .collect()
}

/// Finds the first entry of the first `_errors` list, searching depth-first.
///
/// Fields of nested objects (`embeds.0.title`) put their `_errors` list
/// further down the tree than top-level fields do.
fn first_error(value: &Value) -> Option<Value> {
    match value {
        Value::Object(map) => {
            if let Some(first) = map
                .get("_errors")
                .and_then(Value::as_array)
                .and_then(|list| list.first())
            {
                return Some(first.clone());
            }
            map.iter()
                .filter(|(key, _)| key.as_str() != "_errors")
                .find_map(|(_, nested)| first_error(nested))
        }
        Value::Array(items) => items.iter().find_map(first_error),
        _ => None,
    }
}
