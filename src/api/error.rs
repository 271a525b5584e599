//! Normalized error type for every backend call

use serde_json::{json, Value};
use thiserror::Error;

/// Message used when the backend cannot be reached at all
pub const NETWORK_ERROR_MESSAGE: &str =
    "Cannot reach the quotation server. Please check that the backend is running.";

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No response was received (connection refused, DNS failure, timeout)
    #[error("{message}")]
    Network { message: String, data: Value },

    /// The backend answered with a non-2xx status
    #[error("{message}")]
    Http {
        message: String,
        status: u16,
        data: Value,
    },

    /// A 2xx body that does not match the expected shape
    #[error("Failed to decode response: {message}")]
    Decode { message: String, status: u16 },

    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

impl ApiError {
    /// Wrap a transport failure; the original error text is kept in `data`
    pub fn network(err: impl std::fmt::Display) -> Self {
        ApiError::Network {
            message: NETWORK_ERROR_MESSAGE.to_string(),
            data: json!({ "originalError": err.to_string() }),
        }
    }

    /// HTTP status, `0` when no response was received
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Http { status, .. } | ApiError::Decode { status, .. } => *status,
            ApiError::Network { .. } | ApiError::Setup(_) => 0,
        }
    }

    /// Raw payload that accompanied the error
    pub fn data(&self) -> Value {
        match self {
            ApiError::Network { data, .. } | ApiError::Http { data, .. } => data.clone(),
            ApiError::Decode { .. } | ApiError::Setup(_) => Value::Null,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == 404
    }
}

/// Translate a non-2xx response into an [`ApiError::Http`].
///
/// The message comes from the body's `detail`, then `message`, then falls
/// back to `HTTP <status>`. A body that is not JSON becomes an empty object.
pub fn error_from_response(status: u16, body: &[u8]) -> ApiError {
    let data: Value = serde_json::from_slice(body).unwrap_or_else(|_| json!({}));

    let message = ["detail", "message"]
        .iter()
        .find_map(|key| data.get(*key).and_then(message_text))
        .unwrap_or_else(|| format!("HTTP {}", status));

    ApiError::Http {
        message,
        status,
        data,
    }
}

/// FastAPI validation errors put a list under `detail`; use the first `msg`
fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(Value::as_str))
            .map(String::from),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_wins_over_message() {
        let body = br#"{"detail": "Session sess_1 not found", "message": "ignored"}"#;
        let err = error_from_response(404, body);
        assert_eq!(err.to_string(), "Session sess_1 not found");
        assert_eq!(err.status(), 404);
        assert!(err.is_not_found());
        assert_eq!(err.data()["message"], "ignored");
    }

    #[test]
    fn test_message_field_used_without_detail() {
        let err = error_from_response(500, br#"{"message": "boom"}"#);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_status_fallback_for_non_json_body() {
        let err = error_from_response(502, b"<html>Bad gateway</html>");
        assert_eq!(err.to_string(), "HTTP 502");
        assert_eq!(err.data(), json!({}));
    }

    #[test]
    fn test_validation_error_list() {
        let body = br#"{"detail": [{"loc": ["body", "message"], "msg": "field required"}]}"#;
        let err = error_from_response(422, body);
        assert_eq!(err.to_string(), "field required");
    }

    #[test]
    fn test_network_error_has_zero_status() {
        let err = ApiError::network("connection refused");
        assert!(err.is_network());
        assert_eq!(err.status(), 0);
        assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
        assert_eq!(err.data()["originalError"], "connection refused");
    }
}
