//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;
use courier_telegram::{ApiError, WebhookError};

/// Errors that can occur while orchestrating the bot.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Configuration loading or validation failure.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Bot API call failure during lifecycle management.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Webhook server failure.
    #[error(transparent)]
    Webhook(#[from] WebhookError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
