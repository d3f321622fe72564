//! [`Responder`] implementation over the Bot API client.

use async_trait::async_trait;

use courier_core::{ChatId, Reply, Responder, SendError};

use crate::api::TelegramApi;
use crate::model::InlineKeyboardMarkup;

fn markup_of(reply: &Reply) -> Option<InlineKeyboardMarkup> {
    reply
        .keyboard
        .as_ref()
        .filter(|kb| !kb.is_empty())
        .map(InlineKeyboardMarkup::from)
}

#[async_trait]
impl Responder for TelegramApi {
    async fn send_message(&self, chat: ChatId, reply: Reply) -> Result<(), SendError> {
        let markup = markup_of(&reply);
        TelegramApi::send_message(self, chat.0, &reply.text, markup)
            .await
            .map(|_| ())
            .map_err(SendError::from)
    }

    async fn edit_message(
        &self,
        chat: ChatId,
        message_id: i64,
        reply: Reply,
    ) -> Result<(), SendError> {
        let markup = markup_of(&reply);
        self.edit_message_text(chat.0, message_id, &reply.text, markup)
            .await
            .map(|_| ())
            .map_err(SendError::from)
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<(), SendError> {
        self.answer_callback_query(callback_id, text, show_alert)
            .await
            .map(|_| ())
            .map_err(SendError::from)
    }
}
