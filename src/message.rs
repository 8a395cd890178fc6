//! Message payloads, flags, and file attachments.
//!
//! [`MessagePayload`] is the body shared by `reply`, `component_update`,
//! `edit_original`, and followup `create`/`edit`. Build it in Rust with the
//! `with_*` methods, or deserialize it from the loosely shaped options object
//! a bot framework hands over; aliases are resolved once, at that boundary.

use crate::errors::InteractionError;
use crate::http::multipart::{AttachmentMetadata, attachment_metadata};
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Keys [`MessagePayload`] owns. Entries under these names in
/// [`MessagePayload::extra`] are never sent.
const MODELED_FIELDS: &[&str] = &[
    "content",
    "embeds",
    "embed",
    "allowed_mentions",
    "components",
    "attachments",
    "ephemeral",
    "flags",
    "tts",
    "username",
    "avatar_url",
];

/// Message flag bit marking a response visible only to the invoking user.
pub const EPHEMERAL_FLAG: u64 = 1 << 6;

/// Computes the `flags` value for a payload.
///
/// Bit 6 is the only flag this crate sets; every other bit stays clear.
#[must_use]
pub const fn message_flags(ephemeral: bool) -> u64 {
    if ephemeral { EPHEMERAL_FLAG } else { 0 }
}

/// Reads an `ephemeral` key that counts only when it is the JSON literal `true`.
///
/// `1`, `"true"`, objects, and `null` all read as `false`.
pub(crate) fn strict_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(Value::Bool(true))))
}

/// Controls who can be pinged by a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedMentions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replied_user: Option<bool>,
}

impl AllowedMentions {
    /// Suppresses every mention in the message.
    #[must_use]
    pub fn none() -> Self {
        Self {
            parse: Some(Vec::new()),
            ..Self::default()
        }
    }
}

/// A file uploaded alongside a message.
///
/// Its id on the wire is its position in the payload's attachment list,
/// assigned when the request is encoded. Embeds reference it as
/// `attachment://{filename}`.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub data: Bytes,
    pub filename: String,
    pub description: Option<String>,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("description", &self.description)
            .field("len", &self.data.len())
            .finish()
    }
}

impl Attachment {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            filename: filename.into(),
            description: None,
        }
    }

    /// Sets the alt text shown for the file.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Reads a file from disk, using its file name as the attachment filename.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::Io`] if the file cannot be read, or
    /// [`InteractionError::InvalidInput`] if the path has no UTF-8 file name.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, InteractionError> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                InteractionError::InvalidInput(format!(
                    "attachment path {} has no UTF-8 file name",
                    path.display()
                ))
            })?
            .to_string();
        let data = tokio::fs::read(path).await?;
        tracing::debug!("Read attachment {} ({} bytes)", filename, data.len());
        Ok(Self::new(filename, data))
    }
}

/// A message body for replies, edits, and followups.
///
/// `attachments` decides the wire encoding:
/// - `None`: the field is omitted and the body is plain JSON.
/// - `Some(vec![])`: `"attachments": []` is sent as plain JSON, which clears
///   existing attachments when editing.
/// - one or more files: the body is sent as multipart.
///
/// Message fields without a dedicated member (`poll`, `thread_name`,
/// `sticker_ids`, ...) go in `extra` and are sent as given.
///
/// # Example
///
/// ```
/// use interactions_rs::{Attachment, MessagePayload};
///
/// let payload = MessagePayload::new()
///     .with_content("Here is your report")
///     .with_attachment(Attachment::new("report.txt", b"all good".to_vec()))
///     .with_ephemeral(true);
/// assert_eq!(payload.flags(), 64);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "MessageOptions")]
pub struct MessagePayload {
    pub content: Option<String>,
    pub embeds: Option<Vec<Value>>,
    pub allowed_mentions: Option<AllowedMentions>,
    pub components: Option<Vec<Value>>,
    pub attachments: Option<Vec<Attachment>>,
    pub ephemeral: bool,
    pub tts: Option<bool>,
    /// Overrides the webhook's username (followup `create` only)
    pub username: Option<String>,
    /// Overrides the webhook's avatar (followup `create` only)
    pub avatar_url: Option<String>,
    /// Other top-level message fields, forwarded verbatim
    pub extra: Map<String, Value>,
}

impl MessagePayload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Appends one embed.
    #[must_use]
    pub fn with_embed(mut self, embed: Value) -> Self {
        self.embeds.get_or_insert_with(Vec::new).push(embed);
        self
    }

    #[must_use]
    pub fn with_embeds(mut self, embeds: Vec<Value>) -> Self {
        self.embeds = Some(embeds);
        self
    }

    #[must_use]
    pub fn with_components(mut self, components: Vec<Value>) -> Self {
        self.components = Some(components);
        self
    }

    #[must_use]
    pub fn with_allowed_mentions(mut self, allowed_mentions: AllowedMentions) -> Self {
        self.allowed_mentions = Some(allowed_mentions);
        self
    }

    /// Appends one file; the payload will be sent as multipart.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.get_or_insert_with(Vec::new).push(attachment);
        self
    }

    /// Replaces the attachment list. An empty list is sent as `"attachments": []`.
    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = Some(attachments);
        self
    }

    #[must_use]
    pub const fn with_ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    #[must_use]
    pub const fn with_tts(mut self, tts: bool) -> Self {
        self.tts = Some(tts);
        self
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Sets any other top-level message field, e.g. `poll` or `thread_name`.
    ///
    /// Keys that have their own `with_*` method (and `flags`, which is
    /// derived from `ephemeral`) are ignored when the body is built.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn flags(&self) -> u64 {
        message_flags(self.ephemeral)
    }

    /// Files that travel as multipart parts.
    pub(crate) fn files(&self) -> &[Attachment] {
        self.attachments.as_deref().unwrap_or_default()
    }

    /// The JSON shape of this payload, with attachments reduced to metadata.
    pub(crate) fn to_body(&self) -> MessageBody<'_> {
        MessageBody {
            content: self.content.as_deref(),
            embeds: self.embeds.as_deref(),
            allowed_mentions: self.allowed_mentions.as_ref(),
            components: self.components.as_deref(),
            tts: self.tts,
            username: self.username.as_deref(),
            avatar_url: self.avatar_url.as_deref(),
            attachments: self.attachments.as_deref().map(attachment_metadata),
            flags: self.flags(),
            extra: self
                .extra
                .iter()
                .filter(|(key, _)| !MODELED_FIELDS.contains(&key.as_str()))
                .map(|(key, value)| (key.as_str(), value))
                .collect(),
        }
    }
}

impl From<&str> for MessagePayload {
    fn from(content: &str) -> Self {
        Self::new().with_content(content)
    }
}

impl From<String> for MessagePayload {
    fn from(content: String) -> Self {
        Self::new().with_content(content)
    }
}

/// Wire form of a [`MessagePayload`].
#[derive(Debug, Serialize)]
pub(crate) struct MessageBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    embeds: Option<&'a [Value]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed_mentions: Option<&'a AllowedMentions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<&'a [Value]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachments: Option<Vec<AttachmentMetadata>>,
    flags: u64,
    #[serde(flatten)]
    extra: BTreeMap<&'a str, &'a Value>,
}

/// Boundary shape accepted when deserializing a [`MessagePayload`].
#[derive(Deserialize)]
struct MessageOptions {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    embeds: Option<Vec<Value>>,
    #[serde(default)]
    embed: Option<Value>,
    #[serde(default)]
    allowed_mentions: Option<AllowedMentions>,
    #[serde(default)]
    components: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "strict_true")]
    ephemeral: bool,
    #[serde(default)]
    tts: Option<bool>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<MessageOptions> for MessagePayload {
    fn from(mut options: MessageOptions) -> Self {
        // JSON cannot carry file bytes; only an explicit empty list survives.
        let attachments = match options.extra.remove("attachments") {
            Some(Value::Array(list)) if list.is_empty() => Some(Vec::new()),
            _ => None,
        };
        options.extra.remove("flags");

        Self {
            content: options.content,
            embeds: options.embeds.or_else(|| options.embed.map(|e| vec![e])),
            allowed_mentions: options.allowed_mentions,
            components: options.components,
            attachments,
            ephemeral: options.ephemeral,
            tts: options.tts,
            username: options.username,
            avatar_url: options.avatar_url,
            extra: options.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body_json(payload: &MessagePayload) -> Value {
        serde_json::to_value(payload.to_body()).unwrap()
    }

    #[test]
    fn test_message_flags() {
        assert_eq!(message_flags(true), 64);
        assert_eq!(message_flags(false), 0);
        assert_eq!(EPHEMERAL_FLAG, 1 << 6);
    }

    #[test]
    fn test_ephemeral_only_for_literal_true() {
        let cases = [
            (json!({"ephemeral": true}), 64),
            (json!({"ephemeral": false}), 0),
            (json!({"ephemeral": 1}), 0),
            (json!({"ephemeral": "true"}), 0),
            (json!({"ephemeral": {"yes": true}}), 0),
            (json!({"ephemeral": null}), 0),
            (json!({}), 0),
        ];
        for (input, expected) in cases {
            let payload: MessagePayload = serde_json::from_value(input.clone()).unwrap();
            assert_eq!(payload.flags(), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_singular_embed_alias() {
        let payload: MessagePayload =
            serde_json::from_value(json!({"embed": {"title": "one"}})).unwrap();
        assert_eq!(payload.embeds, Some(vec![json!({"title": "one"})]));
    }

    #[test]
    fn test_embeds_wins_over_embed() {
        let payload: MessagePayload = serde_json::from_value(json!({
            "embeds": [{"title": "list"}],
            "embed": {"title": "single"}
        }))
        .unwrap();
        assert_eq!(payload.embeds, Some(vec![json!({"title": "list"})]));
    }

    #[test]
    fn test_body_omits_unset_fields_but_always_has_flags() {
        let body = body_json(&MessagePayload::from("hi"));
        assert_eq!(body, json!({"content": "hi", "flags": 0}));
    }

    #[test]
    fn test_body_full_shape() {
        let payload = MessagePayload::new()
            .with_content("hello")
            .with_embed(json!({"title": "t"}))
            .with_components(vec![json!({"type": 1, "components": []})])
            .with_allowed_mentions(AllowedMentions::none())
            .with_tts(true)
            .with_username("bot")
            .with_avatar_url("https://cdn.example/a.png")
            .with_ephemeral(true);

        assert_eq!(
            body_json(&payload),
            json!({
                "content": "hello",
                "embeds": [{"title": "t"}],
                "components": [{"type": 1, "components": []}],
                "allowed_mentions": {"parse": []},
                "tts": true,
                "username": "bot",
                "avatar_url": "https://cdn.example/a.png",
                "flags": 64
            })
        );
    }

    #[test]
    fn test_body_attachments_are_metadata_only() {
        let payload = MessagePayload::new()
            .with_attachment(Attachment::new("a.png", vec![1u8, 2, 3]).with_description("first"))
            .with_attachment(Attachment::new("b.txt", b"text".to_vec()));

        assert_eq!(
            body_json(&payload)["attachments"],
            json!([
                {"id": 0, "filename": "a.png", "description": "first"},
                {"id": 1, "filename": "b.txt", "description": ""}
            ])
        );
    }

    #[test]
    fn test_empty_attachment_list_is_kept() {
        let payload = MessagePayload::new().with_attachments(Vec::new());
        assert_eq!(body_json(&payload)["attachments"], json!([]));
        assert!(payload.files().is_empty());
    }

    #[test]
    fn test_unmodeled_fields_pass_through() {
        let payload: MessagePayload = serde_json::from_value(json!({
            "content": "x",
            "poll": {"question": {"text": "Lunch?"}, "answers": []},
            "thread_name": "t",
            "ephemeral": true
        }))
        .unwrap();

        assert_eq!(
            body_json(&payload),
            json!({
                "content": "x",
                "poll": {"question": {"text": "Lunch?"}, "answers": []},
                "thread_name": "t",
                "flags": 64
            })
        );
    }

    #[test]
    fn test_caller_flags_are_replaced_by_computed_flags() {
        let payload: MessagePayload =
            serde_json::from_value(json!({"content": "x", "flags": 4096})).unwrap();
        assert!(payload.extra.is_empty());
        assert_eq!(body_json(&payload), json!({"content": "x", "flags": 0}));
    }

    #[test]
    fn test_loose_empty_attachments_clears() {
        let payload: MessagePayload =
            serde_json::from_value(json!({"attachments": []})).unwrap();
        assert_eq!(payload.attachments, Some(Vec::new()));
        assert_eq!(body_json(&payload), json!({"attachments": [], "flags": 0}));

        let payload: MessagePayload =
            serde_json::from_value(json!({"attachments": [{"id": 0}]})).unwrap();
        assert_eq!(payload.attachments, None);
        assert!(body_json(&payload).get("attachments").is_none());
    }

    #[test]
    fn test_with_field() {
        let payload = MessagePayload::from("hi")
            .with_field("sticker_ids", json!(["1"]))
            .with_field("content", "ignored")
            .with_field("flags", 4);

        assert_eq!(
            body_json(&payload),
            json!({"content": "hi", "sticker_ids": ["1"], "flags": 0})
        );
    }

    #[test]
    fn test_attachment_debug_hides_bytes() {
        let attachment = Attachment::new("big.bin", vec![0u8; 4096]);
        let debug = format!("{:?}", attachment);
        assert!(debug.contains("big.bin"));
        assert!(debug.contains("4096"));
        assert!(!debug.contains("0, 0, 0"));
    }

    #[test]
    fn test_allowed_mentions_roundtrip_fields() {
        let mentions = AllowedMentions {
            users: Some(vec!["1".to_string()]),
            replied_user: Some(false),
            ..AllowedMentions::default()
        };
        assert_eq!(
            serde_json::to_value(&mentions).unwrap(),
            json!({"users": ["1"], "replied_user": false})
        );
    }

    #[tokio::test]
    async fn test_attachment_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        tokio::fs::write(&path, b"hello").await.unwrap();

        let attachment = Attachment::from_path(&path).await.unwrap();
        assert_eq!(attachment.filename, "notes.txt");
        assert_eq!(&attachment.data[..], b"hello");
        assert_eq!(attachment.description, None);
    }

    #[tokio::test]
    async fn test_attachment_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Attachment::from_path(dir.path().join("missing.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, InteractionError::Io(_)));
    }
}
