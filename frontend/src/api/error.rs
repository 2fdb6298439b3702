use serde::Deserialize;
use thiserror::Error;

/// Error returned by every backend call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// 401 / 403 from the backend
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Any other non-2xx response
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to encode request: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ApiError::Unauthorized(message),
            _ => ApiError::Http { status, message },
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(e: gloo_net::Error) -> Self {
        match e {
            gloo_net::Error::SerdeError(e) => ApiError::Decode(e.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

/// Backend error bodies come in a few shapes.
#[derive(Deserialize, Default)]
struct ErrorBody {
    error: Option<String>,
    detail: Option<String>,
    message: Option<String>,
}

/// Pull a human readable message out of an error response body.
pub fn extract_error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.detail).or(b.message))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
