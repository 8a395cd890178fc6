//! Wire-level debugging via LOUD_WIRE environment variable.
//!
//! When `LOUD_WIRE` is set to any value, prints raw JSON of API requests and
//! responses to stderr with pretty formatting and colors.
//!
//! # Usage
//!
//! ```bash
//! LOUD_WIRE=1 cargo test --test callback_tests
//! ```
//!
//! # Output Format
//!
//! - Green `>>>` for outgoing requests
//! - Red `<<<` for incoming responses
//! - Timestamps and request IDs for correlation
//!
//! Interaction tokens are secrets that stay valid for the whole followup
//! window, so they are masked in URLs and in any `"token"` JSON field.
//! Multipart file parts are summarized, never dumped.

use colored::Colorize;
use regex::Regex;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Request ID counter for correlating requests with responses
static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Cached check for whether LOUD_WIRE is enabled
static ENABLED: OnceLock<bool> = OnceLock::new();

static TOKEN_IN_PATH: OnceLock<Regex> = OnceLock::new();

/// Check if LOUD_WIRE debugging is enabled.
///
/// The result is cached after first check. `LOUD_WIRE` must be set before
/// the first API call is made.
#[must_use]
pub fn is_enabled() -> bool {
    *ENABLED.get_or_init(|| std::env::var("LOUD_WIRE").is_ok())
}

/// Get the next request ID for correlation.
#[must_use]
pub fn next_request_id() -> usize {
    REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// JSON fields whose string values are replaced before printing.
const REDACT_FIELDS: &[&str] = &["token"];

const REDACTED: &str = "[redacted]";

/// Masks the token segment of interaction and webhook paths.
///
/// `/interactions/{id}/{token}/...` and `/webhooks/{application_id}/{token}...`
/// both carry the token as the second segment after the resource name.
fn redact_url(url: &str) -> String {
    let re = TOKEN_IN_PATH.get_or_init(|| {
        Regex::new(r"/(interactions|webhooks)/([^/?#]+)/([^/?#]+)")
            .expect("token redaction pattern is valid")
    });
    re.replace_all(url, format!("/$1/$2/{REDACTED}").as_str())
        .into_owned()
}

/// Replaces string values of [`REDACT_FIELDS`] anywhere in a JSON value.
fn redact_fields(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if REDACT_FIELDS.contains(&key.as_str()) && val.is_string() {
                    *val = serde_json::Value::String(REDACTED.to_string());
                } else {
                    redact_fields(val);
                }
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                redact_fields(item);
            }
        }
        _ => {}
    }
}

/// Colorize and format JSON for terminal output.
fn colorize_json(value: &serde_json::Value) -> Option<String> {
    colored_json::to_colored_json_auto(value).ok()
}

fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Log prefix with timestamp and request ID.
fn prefix(request_id: usize) -> String {
    let ts = timestamp().dimmed();
    format!(
        "{} {} {}",
        "[LOUD_WIRE]".bold(),
        ts,
        format!("[REQ#{}]", request_id).cyan()
    )
}

fn print_json_lines(prefix: &str, label: &str, body: &str, max_raw: usize) {
    if let Ok(mut parsed) = serde_json::from_str::<serde_json::Value>(body) {
        redact_fields(&mut parsed);
        eprintln!("{prefix} {label}:");
        if let Some(colored) = colorize_json(&parsed) {
            for line in colored.lines() {
                eprintln!("{prefix} {line}");
            }
        } else if let Ok(pretty) = serde_json::to_string_pretty(&parsed) {
            for line in pretty.lines() {
                eprintln!("{prefix} {line}");
            }
        }
    } else {
        // Not valid JSON, print as-is (truncated for safety)
        let truncated = super::error_helpers::truncate_for_context(body, max_raw);
        eprintln!("{prefix} {label}: {truncated}");
    }
}

/// Log an outgoing HTTP request.
pub fn log_request(request_id: usize, method: &str, url: &str, body: Option<&str>) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = ">>>".green().bold();

    eprintln!("{prefix} {direction} {method} {}", redact_url(url));

    if let Some(body) = body {
        print_json_lines(&prefix, &"Body".green().to_string(), body, 500);
    }
}

/// Log one binary part of a multipart request.
pub fn log_file_part(request_id: usize, part_name: &str, filename: &str, size: usize) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let size_kb = size as f64 / 1024.0;

    eprintln!(
        "{prefix} {} {part_name} \"{filename}\" ({size_kb:.1} KB)",
        "FILE".green().bold()
    );
}

/// Log an incoming HTTP response status.
pub fn log_response_status(request_id: usize, status: u16) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = "<<<".red().bold();
    let status_text = if status < 300 {
        format!("{status} OK").green()
    } else {
        format!("{status} ERROR").red()
    };

    eprintln!("{prefix} {direction} {status_text}");
}

/// Log an incoming HTTP response body.
pub fn log_response_body(request_id: usize, body: &str) {
    if !is_enabled() || body.is_empty() {
        return;
    }

    let prefix = prefix(request_id);
    print_json_lines(&prefix, &"Response".red().to_string(), body, 1000);
}
