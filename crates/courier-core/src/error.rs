//! Unified error types for the dispatch pipeline.
//!
//! Three failure families exist, and only two of them are errors:
//!
//! - [`PayloadError`] - an update's payload violates an expected shape
//!   (e.g. malformed callback data). Handlers catch this at their boundary
//!   and answer the user neutrally.
//! - [`RepositoryError`] / [`SendError`] - a collaborator (persistence,
//!   outbound delivery) failed inside a handler. These propagate through the
//!   middleware chain, are logged with elapsed time, and surface to the
//!   dispatcher's caller.
//! - A throttle drop is **not** an error; it is a normal
//!   [`DispatchOutcome::Throttled`](crate::dispatcher::DispatchOutcome)
//!   control-flow result.

use thiserror::Error;

use crate::update::UserId;

/// An update payload that does not match its expected structure.
#[derive(Debug, Clone, Error)]
#[error("malformed payload '{raw}': {reason}")]
pub struct PayloadError {
    /// The offending raw payload.
    pub raw: String,
    /// What was wrong with it.
    pub reason: &'static str,
}

impl PayloadError {
    /// Creates a payload error for the given raw string.
    pub fn new(raw: impl Into<String>, reason: &'static str) -> Self {
        Self {
            raw: raw.into(),
            reason,
        }
    }
}

/// Errors surfaced by the user-persistence collaborator.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The backing store could not be reached or answered abnormally.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The requested user does not exist.
    #[error("user {0} not found")]
    NotFound(UserId),
}

/// Failure to deliver an outbound payload.
///
/// Delivery is fire-and-forget from the pipeline's perspective; the core
/// logs these but never retries.
#[derive(Debug, Clone, Error)]
#[error("failed to deliver outbound payload: {0}")]
pub struct SendError(pub String);

impl SendError {
    /// Creates a send error with the given detail.
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

/// Any error a dispatch can fail with.
///
/// Unhandled variants propagate to the dispatcher's caller, which logs them
/// and continues the loop; one bad update must never terminate the process.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// Malformed update payload that escaped a handler boundary.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// Persistence collaborator failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Outbound delivery failure a handler chose to propagate.
    #[error(transparent)]
    Send(#[from] SendError),

    /// Application-level handler failure.
    #[error("handler failed: {0}")]
    Handler(String),
}

impl DispatchError {
    /// Creates an application-level handler error.
    pub fn handler(msg: impl Into<String>) -> Self {
        Self::Handler(msg.into())
    }
}
