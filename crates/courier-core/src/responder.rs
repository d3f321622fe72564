//! Outbound-reply collaborator interface.
//!
//! Handlers answer the user through a [`Responder`]. The payload is a
//! [`Reply`]: text plus an optional structured [`Keyboard`]. The pipeline
//! treats the keyboard as opaque; the transport crate owns the wire markup
//! it becomes. Delivery is fire-and-forget: a failed send is logged by
//! whoever chose to ignore it, and the core never retries.

use async_trait::async_trait;

use crate::error::SendError;
use crate::update::ChatId;

/// What an inline button does when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Emit a callback query with this data string.
    Callback(String),
    /// Open a URL.
    Url(String),
}

/// One inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Visible label.
    pub label: String,
    /// Press behavior.
    pub action: ButtonAction,
}

impl Button {
    /// Creates a callback button.
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }

    /// Creates a URL button.
    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Url(url.into()),
        }
    }
}

/// An inline keyboard: rows of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    /// Button rows, top to bottom.
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// Creates an empty keyboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row of buttons (builder pattern).
    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        self.rows.push(buttons);
        self
    }

    /// Returns `true` if the keyboard has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An outbound reply payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Message text.
    pub text: String,
    /// Optional inline keyboard.
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    /// Creates a text-only reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    /// Attaches an inline keyboard (builder pattern).
    pub fn keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Outbound delivery operations a handler may invoke.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Sends a new message to a chat.
    async fn send_message(&self, chat: ChatId, reply: Reply) -> Result<(), SendError>;

    /// Edits an existing message in place (menu navigation).
    async fn edit_message(
        &self,
        chat: ChatId,
        message_id: i64,
        reply: Reply,
    ) -> Result<(), SendError>;

    /// Acknowledges a callback query, optionally with a toast or alert.
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<(), SendError>;
}
