//! Bot API wire types and their conversion to the core update model.
//!
//! Inbound types (`Wire*`) mirror the JSON the Bot API delivers, reduced to
//! the fields the pipeline consumes; unknown fields are ignored on
//! deserialization. Outbound types carry reply markup in the shape
//! `sendMessage` expects; the core's [`Keyboard`] stays opaque to
//! everything above this module.

use serde::{Deserialize, Serialize};

use courier_core::{
    ButtonAction, CallbackQuery, ChatId, Keyboard, Message, Sender, Update, UpdateKind, UserId,
};

// ============================================================================
// Inbound wire types
// ============================================================================

/// One element of a `getUpdates` batch, or a webhook request body.
#[derive(Debug, Clone, Deserialize)]
pub struct WireUpdate {
    /// Monotonically increasing update identifier.
    pub update_id: i64,
    /// New message payload.
    #[serde(default)]
    pub message: Option<WireMessage>,
    /// Edited message payload.
    #[serde(default)]
    pub edited_message: Option<WireMessage>,
    /// Callback query payload.
    #[serde(default)]
    pub callback_query: Option<WireCallbackQuery>,
}

/// A Telegram user object.
#[derive(Debug, Clone, Deserialize)]
pub struct WireUser {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

/// A chat reference; only the id is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct WireChat {
    pub id: i64,
}

/// A message object, reduced to the routed fields.
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub message_id: i64,
    pub chat: WireChat,
    #[serde(default)]
    pub from: Option<WireUser>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A callback query object.
#[derive(Debug, Clone, Deserialize)]
pub struct WireCallbackQuery {
    pub id: String,
    pub from: WireUser,
    #[serde(default)]
    pub message: Option<WireMessage>,
    #[serde(default)]
    pub data: Option<String>,
}

impl From<WireUser> for Sender {
    fn from(user: WireUser) -> Self {
        Sender {
            id: UserId(user.id),
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            language_code: user.language_code,
            is_bot: user.is_bot,
        }
    }
}

impl From<WireMessage> for Message {
    fn from(msg: WireMessage) -> Self {
        Message {
            message_id: msg.message_id,
            chat: ChatId(msg.chat.id),
            from: msg.from.map(Sender::from),
            text: msg.text,
        }
    }
}

impl WireUpdate {
    /// Converts into the core update model.
    ///
    /// Returns `None` for payload kinds the pipeline does not consume
    /// (polls, chat member changes, ...); the transport skips those after
    /// acknowledging their offset, so they are not redelivered.
    pub fn into_update(self) -> Option<Update> {
        let kind = if let Some(msg) = self.message {
            UpdateKind::Message(msg.into())
        } else if let Some(msg) = self.edited_message {
            UpdateKind::EditedMessage(msg.into())
        } else if let Some(cb) = self.callback_query {
            UpdateKind::CallbackQuery(CallbackQuery {
                id: cb.id,
                from: cb.from.into(),
                message: cb.message.map(Message::from),
                data: cb.data,
            })
        } else {
            return None;
        };

        Some(Update {
            id: self.update_id,
            kind,
        })
    }
}

// ============================================================================
// Outbound wire types
// ============================================================================

/// Inline keyboard markup as `sendMessage` / `editMessageText` expect it.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// One inline keyboard button on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&Keyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &Keyboard) -> Self {
        InlineKeyboardMarkup {
            inline_keyboard: keyboard
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| match &button.action {
                            ButtonAction::Callback(data) => InlineKeyboardButton {
                                text: button.label.clone(),
                                callback_data: Some(data.clone()),
                                url: None,
                            },
                            ButtonAction::Url(url) => InlineKeyboardButton {
                                text: button.label.clone(),
                                callback_data: None,
                                url: Some(url.clone()),
                            },
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

/// A command menu entry for `setMyCommands`.
#[derive(Debug, Clone, Serialize)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

impl BotCommand {
    /// Creates a menu entry.
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::{Button, UserId};

    #[test]
    fn message_update_converts() {
        let raw = r#"{
            "update_id": 1001,
            "message": {
                "message_id": 5,
                "chat": {"id": 42, "type": "private"},
                "from": {"id": 42, "is_bot": false, "first_name": "Ann", "username": "ann"},
                "text": "/start"
            }
        }"#;
        let wire: WireUpdate = serde_json::from_str(raw).unwrap();
        let update = wire.into_update().unwrap();

        assert_eq!(update.id, 1001);
        assert_eq!(update.kind_name(), "message");
        assert_eq!(update.text(), Some("/start"));
        assert_eq!(update.from_user().map(|u| u.id), Some(UserId(42)));
        assert_eq!(update.chat_id(), Some(ChatId(42)));
    }

    #[test]
    fn callback_update_converts() {
        let raw = r#"{
            "update_id": 1002,
            "callback_query": {
                "id": "cbq",
                "from": {"id": 7, "is_bot": false, "first_name": "Bob"},
                "message": {"message_id": 9, "chat": {"id": 7}},
                "data": "confirm:yes:delete"
            }
        }"#;
        let wire: WireUpdate = serde_json::from_str(raw).unwrap();
        let update = wire.into_update().unwrap();

        assert_eq!(update.kind_name(), "callback_query");
        assert_eq!(update.text(), Some("confirm:yes:delete"));
        assert_eq!(update.chat_id(), Some(ChatId(7)));
    }

    #[test]
    fn unconsumed_update_kinds_convert_to_none() {
        let raw = r#"{"update_id": 1003}"#;
        let wire: WireUpdate = serde_json::from_str(raw).unwrap();
        assert!(wire.into_update().is_none());
    }

    #[test]
    fn keyboard_markup_serializes_without_null_fields() {
        let keyboard = Keyboard::new()
            .row(vec![
                Button::callback("Profile", "menu:profile"),
                Button::url("Docs", "https://example.com"),
            ]);
        let markup = InlineKeyboardMarkup::from(&keyboard);
        let json = serde_json::to_value(&markup).unwrap();

        assert_eq!(
            json["inline_keyboard"][0][0],
            serde_json::json!({"text": "Profile", "callback_data": "menu:profile"})
        );
        assert_eq!(
            json["inline_keyboard"][0][1],
            serde_json::json!({"text": "Docs", "url": "https://example.com"})
        );
    }
}
