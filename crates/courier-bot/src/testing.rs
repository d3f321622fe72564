//! Test doubles and update constructors for the handler tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use courier_core::{
    CallbackQuery, ChatId, Message, Reply, Responder, SendError, Sender, Update, UpdateKind,
    UserId,
};

pub(crate) fn sender(id: i64) -> Sender {
    Sender {
        id: UserId(id),
        username: Some(format!("user{id}")),
        first_name: format!("User{id}"),
        last_name: None,
        language_code: Some("en".into()),
        is_bot: false,
    }
}

pub(crate) fn message_update(id: i64, user_id: i64, text: &str) -> Update {
    Update {
        id,
        kind: UpdateKind::Message(Message {
            message_id: id,
            chat: ChatId(user_id),
            from: Some(sender(user_id)),
            text: Some(text.into()),
        }),
    }
}

pub(crate) fn callback_update(id: i64, user_id: i64, data: &str) -> Update {
    Update {
        id,
        kind: UpdateKind::CallbackQuery(CallbackQuery {
            id: format!("q{id}"),
            from: sender(user_id),
            message: Some(Message {
                message_id: id,
                chat: ChatId(user_id),
                from: None,
                text: None,
            }),
            data: Some(data.into()),
        }),
    }
}

/// A [`Responder`] that records every outbound call.
#[derive(Default)]
pub(crate) struct RecordingResponder {
    pub sent: Mutex<Vec<(ChatId, Reply)>>,
    pub edited: Mutex<Vec<(ChatId, i64, Reply)>>,
    pub answered: Mutex<Vec<(String, Option<String>, bool)>>,
}

#[async_trait]
impl Responder for RecordingResponder {
    async fn send_message(&self, chat: ChatId, reply: Reply) -> Result<(), SendError> {
        self.sent.lock().push((chat, reply));
        Ok(())
    }

    async fn edit_message(
        &self,
        chat: ChatId,
        message_id: i64,
        reply: Reply,
    ) -> Result<(), SendError> {
        self.edited.lock().push((chat, message_id, reply));
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<(), SendError> {
        self.answered
            .lock()
            .push((callback_id.to_string(), text.map(String::from), show_alert));
        Ok(())
    }
}
