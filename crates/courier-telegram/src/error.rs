//! Error types for the Telegram transport.

use thiserror::Error;

use courier_core::SendError;

/// Errors from talking to the Bot API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP request itself failed (connect, timeout, TLS).
    #[error("http transport failure: {0}")]
    Http(String),

    /// The Bot API answered with `ok: false`.
    #[error("telegram api error {code}: {description}")]
    Telegram {
        /// Bot API `error_code`.
        code: i64,
        /// Bot API `description`.
        description: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<ApiError> for SendError {
    fn from(err: ApiError) -> Self {
        SendError::new(err.to_string())
    }
}

/// Errors from running the webhook server.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Could not bind the listen address.
    #[error("failed to bind {addr}: {reason}")]
    Bind {
        /// The address that failed to bind.
        addr: String,
        /// Underlying I/O detail.
        reason: String,
    },

    /// The server loop terminated abnormally.
    #[error("webhook server error: {0}")]
    Serve(String),
}
