//! Bot API client.
//!
//! A thin typed wrapper over the HTTP interface: every method POSTs JSON to
//! `{api_url}/bot{token}/{method}` and unwraps the `{"ok": ..., "result": ...}`
//! envelope. The client is cheap to clone and safe to share; all methods
//! take `&self`.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::ApiError;
use crate::model::{BotCommand, InlineKeyboardMarkup, WireMessage, WireUpdate};

/// Default Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// HTTP timeout for ordinary calls; long polls add this on top of their
/// poll timeout so the HTTP layer outlives the Bot API's wait.
const CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// The Bot API response envelope.
#[derive(Debug, serde::Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct ApiEnvelope<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

/// A Bot API client bound to one bot token.
#[derive(Clone)]
pub struct TelegramApi {
    http: reqwest::Client,
    base: String,
}

impl TelegramApi {
    /// Creates a client against the public Bot API.
    pub fn new(token: &str) -> Self {
        Self::with_api_url(DEFAULT_API_URL, token)
    }

    /// Creates a client against a custom API endpoint (local Bot API server).
    pub fn with_api_url(api_url: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        }
    }

    async fn call<T, P>(&self, method: &str, payload: &P, timeout: Duration) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let url = format!("{}/{}", self.base, method);
        trace!(method, "bot api call");

        let response = self
            .http
            .post(&url)
            .timeout(timeout)
            .json(payload)
            .send()
            .await?;
        let envelope: ApiEnvelope<T> = response.json().await?;

        if !envelope.ok {
            return Err(ApiError::Telegram {
                code: envelope.error_code.unwrap_or_default(),
                description: envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }
        envelope
            .result
            .ok_or_else(|| ApiError::Decode(format!("'{method}' returned ok without a result")))
    }

    /// Fetches the next batch of updates via long polling.
    ///
    /// `offset` is the acknowledgement cursor: passing `max(update_id) + 1`
    /// marks everything before it as seen, so a restart does not redeliver.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
        allowed_updates: &[String],
    ) -> Result<Vec<WireUpdate>, ApiError> {
        #[derive(Serialize)]
        struct GetUpdates<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            offset: Option<i64>,
            timeout: u64,
            #[serde(skip_serializing_if = "<[String]>::is_empty")]
            allowed_updates: &'a [String],
        }

        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: timeout_secs,
                allowed_updates,
            },
            Duration::from_secs(timeout_secs) + CALL_TIMEOUT,
        )
        .await
    }

    /// Sends a text message, HTML-formatted, with optional inline keyboard.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<WireMessage, ApiError> {
        #[derive(Serialize)]
        struct SendMessage<'a> {
            chat_id: i64,
            text: &'a str,
            parse_mode: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<InlineKeyboardMarkup>,
        }

        self.call(
            "sendMessage",
            &SendMessage {
                chat_id,
                text,
                parse_mode: "HTML",
                reply_markup,
            },
            CALL_TIMEOUT,
        )
        .await
    }

    /// Edits a previously sent message in place.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<serde_json::Value, ApiError> {
        #[derive(Serialize)]
        struct EditMessageText<'a> {
            chat_id: i64,
            message_id: i64,
            text: &'a str,
            parse_mode: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<InlineKeyboardMarkup>,
        }

        self.call(
            "editMessageText",
            &EditMessageText {
                chat_id,
                message_id,
                text,
                parse_mode: "HTML",
                reply_markup,
            },
            CALL_TIMEOUT,
        )
        .await
    }

    /// Acknowledges a callback query, optionally with a toast or alert.
    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<bool, ApiError> {
        #[derive(Serialize)]
        struct AnswerCallbackQuery<'a> {
            callback_query_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            text: Option<&'a str>,
            show_alert: bool,
        }

        self.call(
            "answerCallbackQuery",
            &AnswerCallbackQuery {
                callback_query_id,
                text,
                show_alert,
            },
            CALL_TIMEOUT,
        )
        .await
    }

    /// Publishes the command menu.
    pub async fn set_my_commands(&self, commands: &[BotCommand]) -> Result<bool, ApiError> {
        #[derive(Serialize)]
        struct SetMyCommands<'a> {
            commands: &'a [BotCommand],
        }

        self.call("setMyCommands", &SetMyCommands { commands }, CALL_TIMEOUT)
            .await
    }

    /// Registers the webhook endpoint with the Bot API.
    pub async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
        drop_pending_updates: bool,
    ) -> Result<bool, ApiError> {
        #[derive(Serialize)]
        struct SetWebhook<'a> {
            url: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            secret_token: Option<&'a str>,
            drop_pending_updates: bool,
        }

        self.call(
            "setWebhook",
            &SetWebhook {
                url,
                secret_token,
                drop_pending_updates,
            },
            CALL_TIMEOUT,
        )
        .await
    }

    /// Removes the webhook registration (switching back to polling).
    pub async fn delete_webhook(&self) -> Result<bool, ApiError> {
        self.call("deleteWebhook", &serde_json::json!({}), CALL_TIMEOUT)
            .await
    }
}

impl std::fmt::Debug for TelegramApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The base URL embeds the bot token; never print it.
        f.debug_struct("TelegramApi").finish_non_exhaustive()
    }
}
