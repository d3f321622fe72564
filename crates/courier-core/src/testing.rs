//! Test doubles and update constructors shared by the unit tests.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::error::{RepositoryError, SendError};
use crate::repository::{UserRecord, UserRepository, UserRole};
use crate::responder::{Reply, Responder};
use crate::update::{CallbackQuery, ChatId, Message, Sender, Update, UpdateKind, UserId};

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

pub(crate) fn message_update_no_user(id: i64, text: &str) -> Update {
    Update {
        id,
        kind: UpdateKind::Message(Message {
            message_id: id,
            chat: ChatId(-100),
            from: None,
            text: Some(text.into()),
        }),
    }
}

pub(crate) fn edited_update(id: i64, user_id: i64, text: &str) -> Update {
    Update {
        id,
        kind: UpdateKind::EditedMessage(Message {
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
    fail_sends: bool,
}

impl RecordingResponder {
    /// A responder whose sends all fail, for delivery-failure paths.
    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Responder for RecordingResponder {
    async fn send_message(&self, chat: ChatId, reply: Reply) -> Result<(), SendError> {
        if self.fail_sends {
            return Err(SendError::new("recording responder set to fail"));
        }
        self.sent.lock().push((chat, reply));
        Ok(())
    }

    async fn edit_message(
        &self,
        chat: ChatId,
        message_id: i64,
        reply: Reply,
    ) -> Result<(), SendError> {
        if self.fail_sends {
            return Err(SendError::new("recording responder set to fail"));
        }
        self.edited.lock().push((chat, message_id, reply));
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<(), SendError> {
        if self.fail_sends {
            return Err(SendError::new("recording responder set to fail"));
        }
        self.answered
            .lock()
            .push((callback_id.to_string(), text.map(String::from), show_alert));
        Ok(())
    }
}

/// A [`UserRepository`] with no storage: lookups miss, upserts synthesize.
pub(crate) struct NullRepository;

#[async_trait]
impl UserRepository for NullRepository {
    async fn get_by_telegram_id(
        &self,
        _id: UserId,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(None)
    }

    async fn upsert(&self, sender: &Sender) -> Result<(UserRecord, bool), RepositoryError> {
        let now = Utc::now();
        Ok((
            UserRecord {
                telegram_id: sender.id,
                username: sender.username.clone(),
                first_name: sender.first_name.clone(),
                last_name: sender.last_name.clone(),
                language_code: sender.language_code.clone(),
                is_bot: sender.is_bot,
                is_active: true,
                role: UserRole::User,
                created_at: now,
                updated_at: now,
            },
            true,
        ))
    }

    async fn set_role(&self, _id: UserId, _role: UserRole) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn deactivate(&self, _id: UserId) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn count_active(&self) -> Result<u64, RepositoryError> {
        Ok(0)
    }
}
