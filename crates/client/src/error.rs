//! Client error types and HTTP failure mapping.

use reqwest::StatusCode;
use serde_json::Value;
use session::BackendError;
use thiserror::Error;

/// Errors raised while configuring the client.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to initialise logging: {0}")]
    Telemetry(String),
}

/// Maps a non-success response to the backend error taxonomy.
///
/// - 401 and 403 mean the credentials must be re-established
/// - other 4xx are business rejections carrying the backend's `detail`
/// - 5xx are treated like an unreachable backend
pub fn error_from_status(status: StatusCode, body: &str) -> BackendError {
    let detail = response_detail(body);
    match status.as_u16() {
        401 | 403 => BackendError::Auth { detail },
        400..=499 => BackendError::Conflict {
            status: status.as_u16(),
            detail,
        },
        500..=599 => BackendError::Network(format!("server error {status}")),
        _ => BackendError::Decode(format!("unexpected status {status}")),
    }
}

/// Maps a transport-level failure.
pub fn error_from_transport(error: reqwest::Error) -> BackendError {
    if error.is_decode() {
        BackendError::Decode(error.to_string())
    } else {
        BackendError::Network(error.to_string())
    }
}

/// Extracts the human-readable `detail` from an error body.
///
/// The backend sends either `{"detail": "text"}` or, for request validation
/// failures, `{"detail": [{"msg": "text", ...}, ...]}`.
pub fn response_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(text) => Some(text.clone()).filter(|t| !t.trim().is_empty()),
        Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail() {
        let body = r#"{"detail": "Insufficient stock for Tea. Available: 1, Requested: 2"}"#;
        assert_eq!(
            error_from_status(StatusCode::BAD_REQUEST, body),
            BackendError::Conflict {
                status: 400,
                detail: Some("Insufficient stock for Tea. Available: 1, Requested: 2".to_string()),
            }
        );
    }

    #[test]
    fn test_validation_detail_list() {
        let body = r#"{"detail": [
            {"loc": ["body", "items"], "msg": "field required", "type": "value_error.missing"},
            {"loc": ["body", "payment_mode"], "msg": "str type expected", "type": "type_error.str"}
        ]}"#;
        assert_eq!(
            response_detail(body).as_deref(),
            Some("field required; str type expected")
        );
    }

    #[test]
    fn test_auth_statuses() {
        let forbidden = error_from_status(
            StatusCode::FORBIDDEN,
            r#"{"detail": "Operation not permitted for role"}"#,
        );
        assert_eq!(
            forbidden,
            BackendError::Auth {
                detail: Some("Operation not permitted for role".to_string())
            }
        );
        assert!(error_from_status(StatusCode::UNAUTHORIZED, "").is_auth());
    }

    #[test]
    fn test_server_errors_are_network_failures() {
        assert!(matches!(
            error_from_status(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            BackendError::Network(_)
        ));
    }

    #[test]
    fn test_missing_or_unparseable_detail() {
        assert_eq!(response_detail("not json"), None);
        assert_eq!(response_detail(r#"{"error": "x"}"#), None);
        assert_eq!(response_detail(r#"{"detail": ""}"#), None);
        assert_eq!(
            error_from_status(StatusCode::CONFLICT, ""),
            BackendError::Conflict {
                status: 409,
                detail: None
            }
        );
    }
}
