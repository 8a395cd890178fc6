//! HTTP layer: endpoint paths, the request transport, and body encoding.
//!
//! [`transport`] and [`multipart`] are public so callers can inspect or reuse
//! the encoding; the per-endpoint request functions stay internal.

pub(crate) mod callbacks;
pub mod common;
pub(crate) mod error_helpers;
pub(crate) mod followups;
pub(crate) mod loud_wire;
pub mod multipart;
pub mod transport;
