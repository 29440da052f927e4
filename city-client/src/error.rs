//! Client error types

use shared::{Denied, FieldError};
use thiserror::Error;

/// Shown when the backend gives no usable message
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Authentication required or token rejected
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rejected client-side before any request was made
    #[error("Validation error: {0}")]
    Validation(#[from] FieldError),

    /// The current role may not perform the action
    #[error("Permission denied: {0}")]
    Forbidden(#[from] Denied),

    /// Session storage failure
    #[error("Session error: {0}")]
    Session(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Message suitable for a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Unauthorized(message) => message.clone(),
            Self::Validation(err) => err.message.clone(),
            Self::Forbidden(denied) => denied.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// True when the failure happened before any request was sent
    pub fn is_client_side(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Forbidden(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Pull the `message` out of an error body
///
/// Accepts `{"message": "..."}` and `{"message": ["...", "..."]}`; anything
/// else falls back to [`GENERIC_ERROR_MESSAGE`].
pub fn extract_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return GENERIC_ERROR_MESSAGE.to_string();
    };
    match value.get("message") {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(serde_json::Value::Array(parts)) => {
            let joined = parts
                .iter()
                .filter_map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            if joined.is_empty() {
                GENERIC_ERROR_MESSAGE.to_string()
            } else {
                joined
            }
        }
        _ => GENERIC_ERROR_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_string_message() {
        assert_eq!(extract_message(r#"{"message":"Pole code already exists"}"#), "Pole code already exists");
    }

    #[test]
    fn test_extract_array_message() {
        assert_eq!(
            extract_message(r#"{"message":["code must not be empty","status is invalid"]}"#),
            "code must not be empty; status is invalid"
        );
    }

    #[test]
    fn test_fallback_message() {
        assert_eq!(extract_message("<html>502</html>"), GENERIC_ERROR_MESSAGE);
        assert_eq!(extract_message(r#"{"error":"x"}"#), GENERIC_ERROR_MESSAGE);
        assert_eq!(extract_message(r#"{"message":""}"#), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_user_message_for_validation() {
        let err = ClientError::from(FieldError::new("remark", "remark is required"));
        assert!(err.is_client_side());
        assert_eq!(err.user_message(), "remark is required");
    }
}
