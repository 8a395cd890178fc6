//! # interactions-rs
//!
//! An async client for responding to Discord interactions: slash commands,
//! message components, autocomplete, and modal submissions.
//!
//! Each interaction gets one initial callback through [`Client::callback`].
//! After that, the message it created is reachable as `@original`, and further
//! messages are sent through [`Client::followup`]. Every call returns a
//! normalized [`ApiResponse`]. Platform rejections come back as data, not as
//! `Err`; transport failures (timeouts, resets, cancellation) are `Err`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use interactions_rs::{Attachment, Client, Interaction, MessagePayload};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new()?;
//!     let interaction = Interaction::new("123", "interaction-token", "app-id");
//!
//!     let reply = MessagePayload::from("Here is your report")
//!         .with_ephemeral(true)
//!         .with_attachment(Attachment::new("report.txt", b"all good".to_vec()));
//!
//!     let response = client.callback().reply(&interaction, reply).await?;
//!     if let Some(error) = response.error() {
//!         eprintln!("rejected: {:?}", error.details);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Debugging
//!
//! Set `LOUD_WIRE=1` to print every request and response to stderr. Tokens
//! are redacted.

pub mod callback;
pub mod client;
pub mod errors;
pub mod followup;
pub mod http;
pub mod message;
pub mod response;
pub mod types;

#[cfg(test)]
mod proptest_tests;

pub use callback::{
    AutocompleteChoice, CallbackData, CallbackType, Callbacks, DeferOptions, Modal,
};
pub use client::{Client, ClientBuilder, DEFAULT_TIMEOUT};
pub use errors::InteractionError;
pub use followup::Followups;
pub use http::common::{API_VERSION, ApiVersion, DEFAULT_BASE_URL, Endpoint};
pub use http::multipart::{AttachmentMetadata, FilePart, MultipartBody, attachment_metadata};
pub use http::transport::{RawResponse, RequestBody, Transport};
pub use message::{AllowedMentions, Attachment, EPHEMERAL_FLAG, MessagePayload, message_flags};
pub use response::{ApiError, ApiResponse, normalize};
pub use types::Interaction;

pub use tokio_util::sync::CancellationToken;
