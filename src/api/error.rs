use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("not logged in")]
    NoSession,
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = server_message(body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            _ => ApiError::Status {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// True when the caller should drop the session and log in again.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_) | ApiError::NoSession)
    }
}

/// Pull a human-readable message out of an error body.
///
/// The backend answers with `{"error": ..}`, `{"detail": ..}`,
/// `{"message": ..}` or field errors like `{"new_password": ["too short"]}`.
pub fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;

    for key in ["error", "detail", "message"] {
        if let Some(msg) = obj.get(key).and_then(|v| v.as_str()) {
            return Some(msg.to_string());
        }
    }

    obj.iter().find_map(|(field, v)| {
        let first = match v {
            Value::Array(items) => items.first().and_then(|i| i.as_str()),
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }?;
        Some(format!("{}: {}", field, first))
    })
}
