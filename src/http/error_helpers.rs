//! Helpers for error context formatting and typed body parsing.

use crate::errors::InteractionError;
use serde::de::DeserializeOwned;

/// Maximum characters to include from a response body in error messages
pub(crate) const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

/// Deserializes a JSON value into `T`, attaching a preview of the value on failure.
///
/// # Errors
///
/// Returns [`InteractionError::MalformedResponse`] naming `context` and the
/// offending JSON.
pub(crate) fn deserialize_with_context<T: DeserializeOwned>(
    value: &serde_json::Value,
    context: &str,
) -> Result<T, InteractionError> {
    T::deserialize(value).map_err(|e| {
        let raw = value.to_string();
        InteractionError::MalformedResponse(format!(
            "{} ({})",
            format_json_parse_error(&raw, e),
            context
        ))
    })
}

/// Formats JSON parsing context by including a preview of the raw JSON.
pub(crate) fn format_json_parse_error(json_str: &str, error: serde_json::Error) -> String {
    let preview = truncate_for_context(json_str, ERROR_BODY_PREVIEW_LENGTH);
    format!("JSON parse error: {} | Context: {}", error, preview)
}

/// Truncates a string to specified length, adding "..." if truncated.
///
/// Uses character-boundary-aware slicing to prevent panics on multi-byte UTF-8 characters.
pub(crate) fn truncate_for_context(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        // The character END position must be <= max_len
        let truncate_at = s
            .char_indices()
            .take_while(|(i, c)| i + c.len_utf8() <= max_len)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &s[..truncate_at])
    }
}
