//! Property-based tests for the wire encoders and the response normalizer.

use proptest::prelude::*;
use reqwest::header::HeaderMap;
use serde_json::Value;

use super::callback::DeferOptions;
use super::http::multipart::{encode_body, encode_multipart};
use super::http::transport::{RawResponse, RequestBody};
use super::message::{Attachment, MessagePayload};
use super::response::{ApiResponse, normalize};

// =============================================================================
// Strategy Generators
// =============================================================================

/// Arbitrary JSON values a caller might put under `ephemeral`.
fn arb_json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        ".*".prop_map(Value::String),
        Just(Value::String("true".to_string())),
        Just(Value::from(1)),
    ]
}

fn arb_json() -> impl Strategy<Value = Value> {
    arb_json_leaf().prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn arb_attachment() -> impl Strategy<Value = Attachment> {
    (
        "[a-z]{1,8}\\.[a-z]{2,3}",
        prop::collection::vec(any::<u8>(), 0..64),
        prop::option::of("[ -~]{0,20}"),
    )
        .prop_map(|(filename, data, description)| {
            let attachment = Attachment::new(filename, data);
            match description {
                Some(d) => attachment.with_description(d),
                None => attachment,
            }
        })
}

// =============================================================================
// Flags
// =============================================================================

proptest! {
    #[test]
    fn ephemeral_flag_set_only_for_literal_true(value in arb_json()) {
        let options = serde_json::json!({"content": "x", "ephemeral": value.clone()});
        let payload: MessagePayload = serde_json::from_value(options).unwrap();
        let expected = if value == Value::Bool(true) { 64 } else { 0 };
        prop_assert_eq!(payload.flags(), expected);

        let defer: DeferOptions =
            serde_json::from_value(serde_json::json!({"ephemeral": value})).unwrap();
        prop_assert_eq!(defer.flags(), expected);
    }

    #[test]
    fn flags_never_set_other_bits(ephemeral in any::<bool>()) {
        let flags = MessagePayload::new().with_ephemeral(ephemeral).flags();
        prop_assert_eq!(flags & !64, 0);
    }
}

// =============================================================================
// Multipart Encoding
// =============================================================================

proptest! {
    #[test]
    fn multipart_parts_follow_attachment_order(
        files in prop::collection::vec(arb_attachment(), 1..6)
    ) {
        let payload = MessagePayload::from("files").with_attachments(files.clone());
        let body = encode_multipart(&payload.to_body(), &files).unwrap();

        prop_assert_eq!(body.files.len(), files.len());
        let json: Value = serde_json::from_str(&body.payload_json).unwrap();
        let metadata = json["attachments"].as_array().unwrap();
        prop_assert_eq!(metadata.len(), files.len());

        for (i, (part, file)) in body.files.iter().zip(&files).enumerate() {
            prop_assert_eq!(&part.name, &format!("files[{i}]"));
            prop_assert_eq!(&part.filename, &file.filename);
            prop_assert_eq!(&part.data, &file.data);
            prop_assert_eq!(&metadata[i]["id"], &Value::from(i));
            prop_assert_eq!(&metadata[i]["filename"], &Value::from(file.filename.clone()));
            let description = file.description.clone().unwrap_or_default();
            prop_assert_eq!(&metadata[i]["description"], &Value::from(description));
        }
    }

    #[test]
    fn encode_body_is_json_without_files(content in ".*") {
        let payload = MessagePayload::from(content.as_str());
        let body = encode_body(&payload.to_body(), payload.files()).unwrap();
        let is_json = matches!(body, RequestBody::Json(_));
        prop_assert!(is_json);
    }
}

// =============================================================================
// Response Normalization
// =============================================================================

proptest! {
    #[test]
    fn normalize_never_panics_on_bytes(
        status_code in 100u16..600,
        body in prop::collection::vec(any::<u8>(), 0..128)
    ) {
        let response = normalize(RawResponse {
            status_code,
            headers: HeaderMap::new(),
            body: body.into(),
        });
        prop_assert_eq!(response.status_code(), status_code);
    }

    #[test]
    fn normalize_never_panics(status_code in 100u16..600, body in ".*") {
        let response = normalize(RawResponse {
            status_code,
            headers: HeaderMap::new(),
            body: body.into(),
        });
        prop_assert_eq!(response.status_code(), status_code);
    }

    #[test]
    fn non_json_bodies_pass_through(status_code in 100u16..600, body in "<[a-z]{1,10}>.*") {
        let raw = RawResponse {
            status_code,
            headers: HeaderMap::new(),
            body: body.into(),
        };
        prop_assert_eq!(normalize(raw.clone()), ApiResponse::Raw(raw));
    }

    #[test]
    fn json_objects_without_errors_key_are_json(
        fields in prop::collection::btree_map("[a-d]{1,4}", arb_json_leaf(), 0..5)
    ) {
        let body = Value::Object(fields.into_iter().collect()).to_string();
        let response = normalize(RawResponse {
            status_code: 200,
            headers: HeaderMap::new(),
            body: body.into(),
        });
        let is_json = matches!(response, ApiResponse::Json { .. });
        prop_assert!(is_json);
    }
}
