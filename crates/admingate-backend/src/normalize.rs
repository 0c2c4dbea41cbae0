//! Response normalization and transport error mapping.

use admingate_core::{GatewayError, Result};
use serde_json::Value;

/// Upper bound on how much of a malformed upstream error body is echoed back.
const ERROR_SNIPPET_LEN: usize = 256;

/// Map a reqwest-level failure to a transport-class gateway error.
///
/// DNS failures, refused connections and timeouts all land here; the caller
/// gets a readable message, never a stack trace.
pub fn map_transport(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::transport("backend request timed out")
    } else if err.is_connect() {
        GatewayError::transport(format!("failed to connect to backend: {err}"))
    } else {
        GatewayError::transport(format!("backend request failed: {err}"))
    }
}

/// Normalize a backend response into a JSON value.
///
/// Non-2xx statuses are passed through as [`GatewayError::Upstream`] with a
/// message extracted from the error body when it is well-formed, or a
/// truncated snippet of the raw body otherwise. An empty success body maps
/// to `Value::Null`; a non-JSON success body is a transport-class failure.
pub async fn normalize_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(map_transport)?;

    if !status.is_success() {
        return Err(GatewayError::upstream(
            status.as_u16(),
            extract_error_message(&bytes, status.as_u16()),
        ));
    }

    if bytes.is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&bytes)
        .map_err(|e| GatewayError::transport(format!("backend returned invalid JSON: {e}")))
}

/// Best-effort extraction of a human-readable message from an upstream error
/// body. Accepts `{"message": "..."}`-shaped bodies (the backend's normal
/// error shape); anything else is echoed back truncated.
fn extract_error_message(bytes: &[u8], status: u16) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(bytes) {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
        if let Some(error) = value.get("error").and_then(Value::as_str) {
            return error.to_string();
        }
    }
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.is_empty() {
        format!("backend returned status {status}")
    } else {
        text.chars().take(ERROR_SNIPPET_LEN).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_field() {
        let body = br#"{"message": "name must not be empty", "statusCode": 422}"#;
        assert_eq!(extract_error_message(body, 422), "name must not be empty");
    }

    #[test]
    fn test_extract_error_field_fallback() {
        let body = br#"{"error": "Conflict"}"#;
        assert_eq!(extract_error_message(body, 409), "Conflict");
    }

    #[test]
    fn test_malformed_body_truncated() {
        let body = "x".repeat(500);
        let message = extract_error_message(body.as_bytes(), 500);
        assert_eq!(message.len(), ERROR_SNIPPET_LEN);
    }

    #[test]
    fn test_empty_body_names_status() {
        assert_eq!(extract_error_message(b"", 503), "backend returned status 503");
    }
}
