//! Inbound update model.
//!
//! This module defines the types an update-transport hands to the
//! [`Dispatcher`](crate::dispatcher::Dispatcher):
//!
//! - [`Update`] - one inbound event, a tagged union over the payload kinds
//! - [`UpdateKind`] - payload classification (message, edited message, callback query)
//! - [`Sender`] - the originating Telegram user, when the payload carries one
//! - [`CallbackData`] - structured view over the `"prefix:action[:payload]"`
//!   convention used by inline keyboards
//!
//! Updates are immutable once received. The numeric [`Update::id`] is the
//! Bot API `update_id`; it increases monotonically and the polling transport
//! acknowledges batches by asking for `max(id) + 1`.

use std::fmt;

use crate::error::PayloadError;

/// Numeric Telegram user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Numeric Telegram chat identifier.
///
/// For private chats this equals the peer's [`UserId`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The user a payload originated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    /// Unique Telegram user id.
    pub id: UserId,
    /// Optional @username, stored without the `@`.
    pub username: Option<String>,
    /// First name from the Telegram profile.
    pub first_name: String,
    /// Last name from the Telegram profile.
    pub last_name: Option<String>,
    /// IETF language tag (e.g. `"en"`).
    pub language_code: Option<String>,
    /// Whether the account is a bot.
    pub is_bot: bool,
}

impl Sender {
    /// Human-readable display name: `"First Last"` or just `"First"`.
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

/// A chat message payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message id within its chat.
    pub message_id: i64,
    /// The chat the message was posted in.
    pub chat: ChatId,
    /// Originating user. Absent for e.g. channel posts.
    pub from: Option<Sender>,
    /// Text content, absent for media-only messages.
    pub text: Option<String>,
}

/// An inline-keyboard button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackQuery {
    /// Opaque query id, required to acknowledge the press.
    pub id: String,
    /// The user that pressed the button.
    pub from: Sender,
    /// The message the keyboard was attached to, if still available.
    pub message: Option<Message>,
    /// The button's callback data string.
    pub data: Option<String>,
}

/// Payload classification for an [`Update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateKind {
    /// A new chat message.
    Message(Message),
    /// An edit to a previously sent message.
    EditedMessage(Message),
    /// An inline-keyboard button press.
    CallbackQuery(CallbackQuery),
}

/// One inbound event from the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    /// Monotonically increasing Bot API `update_id`.
    pub id: i64,
    /// The payload.
    pub kind: UpdateKind,
}

impl Update {
    /// Returns the originating user, if the payload carries one.
    pub fn from_user(&self) -> Option<&Sender> {
        match &self.kind {
            UpdateKind::Message(msg) | UpdateKind::EditedMessage(msg) => msg.from.as_ref(),
            UpdateKind::CallbackQuery(cb) => Some(&cb.from),
        }
    }

    /// Returns the chat the update belongs to, if any.
    ///
    /// For callback queries this is the chat of the message the keyboard
    /// was attached to.
    pub fn chat_id(&self) -> Option<ChatId> {
        match &self.kind {
            UpdateKind::Message(msg) | UpdateKind::EditedMessage(msg) => Some(msg.chat),
            UpdateKind::CallbackQuery(cb) => cb.message.as_ref().map(|m| m.chat),
        }
    }

    /// Returns the textual payload: message text or callback data.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            UpdateKind::Message(msg) | UpdateKind::EditedMessage(msg) => msg.text.as_deref(),
            UpdateKind::CallbackQuery(cb) => cb.data.as_deref(),
        }
    }

    /// Stable name of the payload kind, used in log events.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            UpdateKind::Message(_) => "message",
            UpdateKind::EditedMessage(_) => "edited_message",
            UpdateKind::CallbackQuery(_) => "callback_query",
        }
    }
}

// ============================================================================
// Callback data convention
// ============================================================================

/// Structured view over a `"prefix:action[:payload]"` callback data string.
///
/// Inline keyboards encode what a button does in its callback data. The
/// convention is two or three colon-separated segments; the optional third
/// segment may itself contain colons and is passed through verbatim.
///
/// # Example
///
/// ```rust,ignore
/// let data = CallbackData::parse("confirm:yes:delete_account")?;
/// assert_eq!(data.prefix, "confirm");
/// assert_eq!(data.action, "yes");
/// assert_eq!(data.payload, Some("delete_account"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackData<'a> {
    /// Namespace segment, e.g. `"menu"` or `"confirm"`.
    pub prefix: &'a str,
    /// Action segment, e.g. `"profile"` or `"yes"`.
    pub action: &'a str,
    /// Optional free-form payload after the second colon.
    pub payload: Option<&'a str>,
}

impl<'a> CallbackData<'a> {
    /// Parses a raw callback data string.
    ///
    /// Returns a [`PayloadError`] when the string has fewer than two
    /// segments or an empty prefix/action. Handlers catch this at their
    /// boundary and answer the user neutrally instead of failing the
    /// whole dispatch.
    pub fn parse(raw: &'a str) -> Result<Self, PayloadError> {
        let mut parts = raw.splitn(3, ':');
        let prefix = parts.next().unwrap_or_default();
        let Some(action) = parts.next() else {
            return Err(PayloadError::new(raw, "expected at least two ':' segments"));
        };
        if prefix.is_empty() {
            return Err(PayloadError::new(raw, "empty prefix segment"));
        }
        if action.is_empty() {
            return Err(PayloadError::new(raw, "empty action segment"));
        }
        Ok(Self {
            prefix,
            action,
            payload: parts.next(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender(id: i64) -> Sender {
        Sender {
            id: UserId(id),
            username: Some("tester".into()),
            first_name: "Test".into(),
            last_name: None,
            language_code: Some("en".into()),
            is_bot: false,
        }
    }

    #[test]
    fn full_name_with_and_without_last_name() {
        let mut user = sender(1);
        assert_eq!(user.full_name(), "Test");
        user.last_name = Some("Er".into());
        assert_eq!(user.full_name(), "Test Er");
    }

    #[test]
    fn update_accessors_for_message() {
        let update = Update {
            id: 10,
            kind: UpdateKind::Message(Message {
                message_id: 1,
                chat: ChatId(42),
                from: Some(sender(42)),
                text: Some("hello".into()),
            }),
        };
        assert_eq!(update.from_user().map(|u| u.id), Some(UserId(42)));
        assert_eq!(update.chat_id(), Some(ChatId(42)));
        assert_eq!(update.text(), Some("hello"));
        assert_eq!(update.kind_name(), "message");
    }

    #[test]
    fn update_accessors_for_callback() {
        let update = Update {
            id: 11,
            kind: UpdateKind::CallbackQuery(CallbackQuery {
                id: "q1".into(),
                from: sender(7),
                message: Some(Message {
                    message_id: 2,
                    chat: ChatId(7),
                    from: None,
                    text: None,
                }),
                data: Some("menu:main".into()),
            }),
        };
        assert_eq!(update.from_user().map(|u| u.id), Some(UserId(7)));
        assert_eq!(update.chat_id(), Some(ChatId(7)));
        assert_eq!(update.text(), Some("menu:main"));
        assert_eq!(update.kind_name(), "callback_query");
    }

    #[test]
    fn callback_data_two_segments() {
        let data = CallbackData::parse("menu:profile").unwrap();
        assert_eq!(data.prefix, "menu");
        assert_eq!(data.action, "profile");
        assert_eq!(data.payload, None);
    }

    #[test]
    fn callback_data_payload_keeps_extra_colons() {
        let data = CallbackData::parse("confirm:yes:delete:everything").unwrap();
        assert_eq!(data.prefix, "confirm");
        assert_eq!(data.action, "yes");
        assert_eq!(data.payload, Some("delete:everything"));
    }

    #[test]
    fn callback_data_rejects_malformed() {
        assert!(CallbackData::parse("confirm").is_err());
        assert!(CallbackData::parse(":yes").is_err());
        assert!(CallbackData::parse("confirm:").is_err());
    }
}
