//! Axum rendering of the gateway error envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use admingate_core::GatewayError;

/// Newtype over [`GatewayError`] carrying the `IntoResponse` impl; the core
/// error lives in another crate, so the axum trait is implemented here.
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "gateway request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self.0, "gateway request rejected");
        }

        (status, Json(self.0.to_body())).into_response()
    }
}
