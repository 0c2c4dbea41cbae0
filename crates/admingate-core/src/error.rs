use serde_json::{Value, json};
use thiserror::Error;

/// Gateway error taxonomy.
///
/// Every component-level failure is converted into one of these variants at
/// the request boundary and rendered as the `{statusCode, message, error}`
/// envelope. Nothing escapes as an unhandled panic to the HTTP layer.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid request path: {0}")]
    InvalidPath(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method {method} not allowed for {resource}")]
    MethodNotAllowed { method: String, resource: String },

    /// Backend replied with a non-2xx status; the status is passed through.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Network-level or parse-level failure talking to the backend.
    #[error("Backend unavailable: {0}")]
    Transport(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn method_not_allowed(method: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::MethodNotAllowed {
            method: method.into(),
            resource: resource.into(),
        }
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status code this error is rendered with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidPath(_) | Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::MethodNotAllowed { .. } => 405,
            Self::Upstream { status, .. } => *status,
            Self::Transport(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// Short reason label for the `error` field of the envelope.
    pub fn error_label(&self) -> &'static str {
        match self {
            Self::InvalidPath(_) | Self::Validation(_) => "Bad Request",
            Self::Unauthorized(_) => "Unauthorized",
            Self::NotFound(_) => "Not Found",
            Self::MethodNotAllowed { .. } => "Method Not Allowed",
            Self::Upstream { status, .. } => reason_phrase(*status),
            Self::Transport(_) => "Bad Gateway",
            Self::Internal(_) => "Internal Server Error",
        }
    }

    /// Check if this error is a client error (4xx category).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Check if this error is a server error (5xx category).
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// The stable JSON envelope returned to callers.
    pub fn to_body(&self) -> Value {
        json!({
            "statusCode": self.status_code(),
            "message": self.to_string(),
            "error": self.error_label(),
        })
    }
}

/// Canonical reason phrase for upstream statuses passed through verbatim.
fn reason_phrase(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        s if (400..500).contains(&s) => "Client Error",
        _ => "Server Error",
    }
}

/// Convenience result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(GatewayError::invalid_path("empty").status_code(), 400);
        assert_eq!(GatewayError::validation("missing id").status_code(), 400);
        assert_eq!(GatewayError::unauthorized("no token").status_code(), 401);
        assert_eq!(GatewayError::not_found("nope").status_code(), 404);
        assert_eq!(
            GatewayError::method_not_allowed("PUT", "users").status_code(),
            405
        );
        assert_eq!(GatewayError::transport("refused").status_code(), 502);
        assert_eq!(GatewayError::internal("bug").status_code(), 500);
    }

    #[test]
    fn test_upstream_status_passthrough() {
        let err = GatewayError::upstream(422, "name must not be empty");
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_label(), "Unprocessable Entity");
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_envelope_shape() {
        let err = GatewayError::unauthorized("Missing bearer token");
        let body = err.to_body();
        assert_eq!(body["statusCode"], 401);
        assert_eq!(body["message"], "Missing bearer token");
        assert_eq!(body["error"], "Unauthorized");
    }

    #[test]
    fn test_method_not_allowed_message() {
        let err = GatewayError::method_not_allowed("DELETE", "app-settings");
        assert_eq!(
            err.to_string(),
            "Method DELETE not allowed for app-settings"
        );
    }

    #[test]
    fn test_client_vs_server_classification() {
        assert!(GatewayError::validation("x").is_client_error());
        assert!(GatewayError::transport("x").is_server_error());
        assert!(GatewayError::upstream(503, "down").is_server_error());
        assert!(!GatewayError::upstream(404, "gone").is_server_error());
    }

    #[test]
    fn test_unknown_upstream_reason_phrases() {
        assert_eq!(GatewayError::upstream(418, "teapot").error_label(), "Client Error");
        assert_eq!(GatewayError::upstream(599, "odd").error_label(), "Server Error");
    }
}
