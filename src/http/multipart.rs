//! Attachment encoding.
//!
//! A request that carries files is sent as `multipart/form-data` with one
//! binary part per file (`files[0]`, `files[1]`, ...) followed by a single
//! `payload_json` text part. Inside the JSON, each attachment is reduced to
//! `{id, filename, description}` where `id` is the file's index, so the bytes
//! only ever travel in their own part.

use super::transport::RequestBody;
use crate::errors::InteractionError;
use crate::message::Attachment;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Serialize;

/// Name of the multipart part carrying the JSON payload.
pub const PAYLOAD_JSON_PART: &str = "payload_json";

/// JSON-side record of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentMetadata {
    pub id: usize,
    pub filename: String,
    pub description: String,
}

/// Rewrites attachments into metadata records, ids assigned by position.
#[must_use]
pub fn attachment_metadata(attachments: &[Attachment]) -> Vec<AttachmentMetadata> {
    attachments
        .iter()
        .enumerate()
        .map(|(id, attachment)| AttachmentMetadata {
            id,
            filename: attachment.filename.clone(),
            description: attachment.description.clone().unwrap_or_default(),
        })
        .collect()
}

/// Name of the binary part for the attachment at `index`.
#[must_use]
pub fn file_part_name(index: usize) -> String {
    format!("files[{index}]")
}

/// One binary part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub name: String,
    pub filename: String,
    pub data: Bytes,
}

/// A multipart body before it is handed to the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub files: Vec<FilePart>,
    pub payload_json: String,
}

impl MultipartBody {
    /// Total bytes of file content.
    #[must_use]
    pub fn file_bytes(&self) -> usize {
        self.files.iter().map(|f| f.data.len()).sum()
    }

    /// Builds the reqwest form. Every part has a known length, so the
    /// request goes out with a `Content-Length` rather than chunked.
    pub(crate) fn into_form(self) -> Form {
        let mut form = Form::new();
        for file in self.files {
            let length = file.data.len() as u64;
            let part = Part::stream_with_length(file.data, length).file_name(file.filename);
            form = form.part(file.name, part);
        }
        form.part(PAYLOAD_JSON_PART, Part::text(self.payload_json))
    }
}

/// Encodes an envelope and its files as a multipart body.
///
/// `envelope` must already carry the metadata produced by
/// [`attachment_metadata`] for the same `attachments` slice. Every caller
/// builds it from a [`MessagePayload`](crate::MessagePayload), whose wire
/// form derives that metadata from the files it holds.
///
/// # Errors
///
/// Returns [`InteractionError::InvalidInput`] when `attachments` is empty;
/// such requests take the plain JSON path instead (see [`encode_body`]).
pub(crate) fn encode_multipart<T: Serialize>(
    envelope: &T,
    attachments: &[Attachment],
) -> Result<MultipartBody, InteractionError> {
    if attachments.is_empty() {
        return Err(InteractionError::InvalidInput(
            "multipart encoding requires at least one attachment".to_string(),
        ));
    }

    let files = attachments
        .iter()
        .enumerate()
        .map(|(index, attachment)| FilePart {
            name: file_part_name(index),
            filename: attachment.filename.clone(),
            data: attachment.data.clone(),
        })
        .collect();

    Ok(MultipartBody {
        files,
        payload_json: serde_json::to_string(envelope)?,
    })
}

/// Chooses the wire encoding: plain JSON without files, multipart with them.
///
/// # Errors
///
/// Returns [`InteractionError::Json`] if the envelope cannot be serialized.
pub(crate) fn encode_body<T: Serialize>(
    envelope: &T,
    attachments: &[Attachment],
) -> Result<RequestBody, InteractionError> {
    if attachments.is_empty() {
        Ok(RequestBody::Json(serde_json::to_vec(envelope)?))
    } else {
        encode_multipart(envelope, attachments).map(RequestBody::Multipart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessagePayload;
    use serde_json::{Value, json};

    fn attachments() -> Vec<Attachment> {
        vec![
            Attachment::new("cat.png", vec![0x89u8, b'P', b'N', b'G']).with_description("a cat"),
            Attachment::new("log.txt", b"line one\nline two".to_vec()),
        ]
    }

    #[test]
    fn test_attachment_metadata_ids_follow_order() {
        let metadata = attachment_metadata(&attachments());
        assert_eq!(
            metadata,
            vec![
                AttachmentMetadata {
                    id: 0,
                    filename: "cat.png".to_string(),
                    description: "a cat".to_string(),
                },
                AttachmentMetadata {
                    id: 1,
                    filename: "log.txt".to_string(),
                    description: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_encode_multipart_parts() {
        let files = attachments();
        let payload = MessagePayload::new()
            .with_content("see attached")
            .with_attachments(files.clone());
        let body = encode_multipart(&payload.to_body(), &files).unwrap();

        let names: Vec<&str> = body.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["files[0]", "files[1]"]);
        assert_eq!(body.files[0].filename, "cat.png");
        assert_eq!(&body.files[1].data[..], b"line one\nline two");
        assert_eq!(body.file_bytes(), 4 + 17);

        let json: Value = serde_json::from_str(&body.payload_json).unwrap();
        assert_eq!(json["content"], "see attached");
        assert_eq!(json["attachments"][1]["id"], 1);
    }

    #[test]
    fn test_payload_json_has_no_binary() {
        let files = vec![Attachment::new("secret.bin", b"BINARY-MARKER".to_vec())];
        let payload = MessagePayload::new().with_attachments(files.clone());
        let body = encode_multipart(&payload.to_body(), &files).unwrap();

        assert!(!body.payload_json.contains("BINARY-MARKER"));
        let json: Value = serde_json::from_str(&body.payload_json).unwrap();
        assert_eq!(
            json["attachments"],
            json!([{"id": 0, "filename": "secret.bin", "description": ""}])
        );
    }

    #[test]
    fn test_encode_multipart_rejects_empty() {
        let err = encode_multipart(&json!({}), &[]).unwrap_err();
        assert!(matches!(err, InteractionError::InvalidInput(_)));
    }

    #[test]
    fn test_encode_body_empty_attachments_is_json() {
        let payload = MessagePayload::from("plain").with_attachments(Vec::new());
        let body = encode_body(&payload.to_body(), payload.files()).unwrap();
        match body {
            RequestBody::Json(bytes) => {
                let json: Value = serde_json::from_slice(&bytes).unwrap();
                assert_eq!(json["content"], "plain");
                assert_eq!(json["attachments"], json!([]));
            }
            other => panic!("expected JSON body, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_body_with_attachments_is_multipart() {
        let files = attachments();
        let body = encode_body(&json!({"type": 4, "data": {}}), &files).unwrap();
        assert!(matches!(body, RequestBody::Multipart(ref mp) if mp.files.len() == 2));
    }

    #[test]
    fn test_callback_envelope_metadata_matches_parts() {
        use crate::callback::CallbackData;

        let files = attachments();
        let data = CallbackData::UpdateMessage(MessagePayload::new().with_attachments(files));
        let body = match encode_body(&data.to_envelope(), data.attachments()).unwrap() {
            RequestBody::Multipart(body) => body,
            other => panic!("expected multipart body, got {:?}", other),
        };

        let json: Value = serde_json::from_str(&body.payload_json).unwrap();
        assert_eq!(json["type"], 7);
        let metadata = json["data"]["attachments"].as_array().unwrap();
        assert_eq!(metadata.len(), body.files.len());
        for (i, part) in body.files.iter().enumerate() {
            assert_eq!(part.name, file_part_name(i));
            assert_eq!(metadata[i]["id"], i);
            assert_eq!(metadata[i]["filename"], part.filename.as_str());
        }
    }

    #[test]
    fn test_file_part_name() {
        assert_eq!(file_part_name(0), "files[0]");
        assert_eq!(file_part_name(12), "files[12]");
    }
}
