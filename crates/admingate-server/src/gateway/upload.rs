//! Upload forwarder: re-streams an inbound multipart form to the backend.

use axum::{
    body::Body,
    extract::{FromRequest, Multipart},
    http::{Request, StatusCode, header::CONTENT_TYPE},
    response::Response,
};
use tracing::debug;

use admingate_backend::UploadFile;
use admingate_core::GatewayError;

use super::error::ApiError;
use crate::server::AppState;

/// Default backend column populated with the uploaded file reference when
/// the caller does not name one.
pub const DEFAULT_REF_COLUMN: &str = "image_id";

/// `POST /api/{resource}/{id}/upload`.
///
/// Reads the inbound multipart stream (one or more files plus an optional
/// `refColumn` text field), re-encodes it, and proxies it to the backend
/// with the bearer token attached. The backend's status code and body pass
/// through unchanged.
pub async fn forward(
    state: &AppState,
    resource: &str,
    id: &str,
    token: Option<&str>,
    request: Request<Body>,
) -> Result<Response, ApiError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| GatewayError::validation(format!("invalid multipart body: {e}")))?;

    let mut ref_column = DEFAULT_REF_COLUMN.to_string();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::validation(format!("failed to read multipart field: {e}")))?
    {
        if field.file_name().is_some() {
            let field_name = field.name().unwrap_or("files").to_string();
            let file_name = field.file_name().unwrap_or("file").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| {
                    GatewayError::validation(format!("failed to read file {file_name}: {e}"))
                })?
                .to_vec();
            files.push(UploadFile {
                field_name,
                file_name,
                content_type,
                bytes,
            });
        } else if field.name() == Some("refColumn") {
            ref_column = field
                .text()
                .await
                .map_err(|e| GatewayError::validation(format!("invalid refColumn field: {e}")))?;
        }
        // Unknown text fields are dropped; the backend contract is files + refColumn.
    }

    if files.is_empty() {
        return Err(GatewayError::validation("at least one file is required").into());
    }

    debug!(resource, id, ref_column = %ref_column, files = files.len(), "forwarding upload");

    let reply = state
        .backend
        .upload(resource, id, files, &ref_column, token)
        .await?;

    let mut builder = Response::builder().status(
        StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    );
    if let Some(content_type) = reply.content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(reply.body))
        .map_err(|e| GatewayError::internal(format!("failed to build upload response: {e}")).into())
}
