use serde::Deserialize;
use thiserror::Error;

/// Errors returned by the OpenAI API
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OpenAIApiError {
    #[error("Invalid request (400): {message}")]
    InvalidRequest { message: String },

    #[error("Authentication error (401): {message}")]
    Authentication { message: String },

    #[error("Permission error (403): {message}")]
    Permission { message: String },

    #[error("Not found (404): {message}")]
    NotFound { message: String },

    #[error("Rate limit exceeded (429): {message}")]
    RateLimit { message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Catch-all for unexpected status codes
    #[error("Unexpected API error ({status}): {message}")]
    Unexpected { status: u16, message: String },
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAIApiError {
    /// Builds the error from a non-success status and the raw body. Bodies
    /// that aren't the usual `{"error": {...}}` envelope are kept verbatim.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            400 => Self::InvalidRequest { message },
            401 => Self::Authentication { message },
            403 => Self::Permission { message },
            404 => Self::NotFound { message },
            429 => Self::RateLimit { message },
            500..=599 => Self::Server { status, message },
            _ => Self::Unexpected { status, message },
        }
    }
}
