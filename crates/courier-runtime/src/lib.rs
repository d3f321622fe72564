//! # Courier Runtime
//!
//! Orchestration layer for the Courier Telegram bot: layered configuration
//! (TOML file + `COURIER_*` environment), tracing-based logging setup, and
//! the [`BotRuntime`] that selects a transport (polling or webhook) from
//! configuration and manages startup, the command menu, and graceful
//! shutdown around a shared dispatcher.

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{ConfigError, ConfigLoader, CourierConfig, load_config};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::LoggingBuilder;
pub use runtime::BotRuntime;
