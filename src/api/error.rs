//! Error type shared by every API call

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the HR API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("API {status} error: {message}")]
    Request { status: u16, message: String },

    /// The request never completed (connection refused, TLS, timeout, ...)
    #[error("Network request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose body was not the expected JSON
    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    /// The request URL could not be parsed
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request payload could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status for `Request` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Optional error payload the server may send
#[derive(Debug, Deserialize)]
struct ServerError {
    message: Option<String>,
}

/// Builds the `Request` error for a failed response
///
/// Prefers a `message` field from a JSON body; otherwise uses the canonical
/// reason for the status code. reqwest does not expose the reason phrase the
/// server actually sent.
pub(crate) fn request_error(status: StatusCode, body: &str) -> ApiError {
    let server_message = serde_json::from_str::<ServerError>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty());

    let message = server_message
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown Status").to_string());

    ApiError::Request {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_is_preferred() {
        let err = request_error(StatusCode::NOT_FOUND, r#"{"message": "not found"}"#);
        assert_eq!(err.to_string(), "API 404 error: not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_falls_back_to_status_text() {
        let err = request_error(StatusCode::INTERNAL_SERVER_ERROR, r#"{"title": "boom"}"#);
        assert_eq!(err.to_string(), "API 500 error: Internal Server Error");
    }

    #[test]
    fn test_fallback_ignores_server_reason_phrase() {
        // A plain-text body carries no message; the canonical reason is used
        let err = request_error(StatusCode::SERVICE_UNAVAILABLE, "Down for maintenance");
        assert_eq!(err.to_string(), "API 503 error: Service Unavailable");
    }

    #[test]
    fn test_non_json_body_falls_back_to_status_text() {
        let err = request_error(StatusCode::BAD_REQUEST, "<html>bad</html>");
        assert_eq!(err.to_string(), "API 400 error: Bad Request");
    }

    #[test]
    fn test_empty_message_falls_back_to_status_text() {
        let err = request_error(StatusCode::CONFLICT, r#"{"message": ""}"#);
        assert_eq!(err.to_string(), "API 409 error: Conflict");
    }

    #[test]
    fn test_unknown_status_code() {
        let status = StatusCode::from_u16(599).unwrap();
        let err = request_error(status, "");
        assert_eq!(err.to_string(), "API 599 error: Unknown Status");
    }

    #[test]
    fn test_malformed_body_has_no_status() {
        let err = ApiError::MalformedBody("expected array".to_string());
        assert!(err.status().is_none());
        assert!(err.to_string().contains("expected array"));
    }
}
