//! Outbound HTTP surface of the gateway.
//!
//! [`BackendClient`] issues the standard CRUD operations and the multipart
//! upload against the backend REST API. Every response passes through a
//! single normalization step ([`normalize`]) so that transport failures and
//! upstream error bodies always map to a structured [`GatewayError`].
//!
//! [`GatewayError`]: admingate_core::GatewayError

pub mod client;
pub mod normalize;

pub use client::{BackendClient, UploadFile, UploadResponse};
