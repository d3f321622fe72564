//! # Courier Telegram
//!
//! Telegram Bot API transport for the Courier dispatch pipeline.
//!
//! This crate owns everything Bot-API-shaped so the pipeline does not have
//! to: the wire types ([`model`]), a typed HTTP client ([`api`]), the
//! [`Responder`](courier_core::Responder) implementation over it, and the
//! two ways of receiving updates:
//!
//! - [`PollingTransport`] — a `getUpdates` long-poll loop with offset
//!   acknowledgement (development default);
//! - [`WebhookServer`] — an axum endpoint the Bot API pushes updates to,
//!   with secret-token validation and a health probe (production).
//!
//! Both transports hand every accepted update to a shared
//! [`Dispatcher`](courier_core::Dispatcher) as an independent task and
//! drain in-flight dispatches on shutdown.

pub mod api;
pub mod error;
pub mod model;
pub mod polling;
pub mod responder;
pub mod webhook;

pub use api::{DEFAULT_API_URL, TelegramApi};
pub use error::{ApiError, WebhookError};
pub use model::{BotCommand, InlineKeyboardButton, InlineKeyboardMarkup, WireUpdate};
pub use polling::{PollingConfig, PollingTransport};
pub use webhook::{WebhookConfig, WebhookServer};
