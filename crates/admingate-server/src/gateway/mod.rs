//! The generic resource gateway.
//!
//! Turns `METHOD /api/{resource}[/{id}[/{action}]]` into a call against the
//! backend REST API. Control flow: path parse → special-route short-circuit
//! → CRUD executor or action dispatcher → list post-processing for emulated
//! resources → uniform response envelope.

pub mod error;
pub mod handler;
pub mod routes;
pub mod special;
pub mod upload;

pub use error::ApiError;
pub use routes::{RouteKind, RouteTable};
