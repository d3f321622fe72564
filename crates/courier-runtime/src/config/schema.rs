//! Configuration schema definitions.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CourierConfig {
    /// Telegram connection settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Webhook settings, used when `telegram.mode = "webhook"`.
    #[serde(default)]
    pub webhook: WebhookSettings,

    /// Per-user throttling settings.
    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How updates are received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    /// Long polling (development default).
    #[default]
    Polling,
    /// Webhook push (production).
    Webhook,
}

impl BotMode {
    /// Stable lowercase name, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            BotMode::Polling => "polling",
            BotMode::Webhook => "webhook",
        }
    }
}

/// Telegram connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token. Required; usually set via `COURIER_TELEGRAM__TOKEN`.
    #[serde(default)]
    pub token: String,

    /// Bot API endpoint, overridable for local Bot API servers.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Update receiving mode.
    #[serde(default)]
    pub mode: BotMode,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_api_url(),
            mode: BotMode::default(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

/// Webhook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookSettings {
    /// Public HTTPS base the Bot API can reach, e.g. `https://example.com`.
    #[serde(default)]
    pub public_url: Option<String>,

    /// Path updates are POSTed to.
    #[serde(default = "default_webhook_path")]
    pub path: String,

    /// Shared secret echoed back by the Bot API on every request.
    #[serde(default)]
    pub secret: Option<String>,

    /// Local listen host.
    #[serde(default = "default_bind_host")]
    pub bind_host: String,

    /// Local listen port.
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            public_url: None,
            path: default_webhook_path(),
            secret: None,
            bind_host: default_bind_host(),
            bind_port: default_bind_port(),
        }
    }
}

impl WebhookSettings {
    /// The local listen address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.bind_port)
    }

    /// The full public webhook URL, when a public base is configured.
    pub fn external_url(&self) -> Option<String> {
        self.public_url
            .as_ref()
            .map(|base| format!("{}{}", base.trim_end_matches('/'), self.path))
    }
}

fn default_webhook_path() -> String {
    "/webhook".to_string()
}

fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

/// Per-user throttling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Minimum milliseconds between admitted updates per user.
    #[serde(default = "default_throttle_rate_ms")]
    pub rate_ms: u64,

    /// Override for the notice sent to throttled users; `None` keeps the
    /// built-in text.
    #[serde(default)]
    pub notice: Option<String>,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            rate_ms: default_throttle_rate_ms(),
            notice: None,
        }
    }
}

impl ThrottleConfig {
    /// The rate as a [`Duration`].
    pub fn rate(&self) -> Duration {
        Duration::from_millis(self.rate_ms)
    }
}

fn default_throttle_rate_ms() -> u64 {
    500
}

/// Log verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Converts to the tracing level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line, human-oriented (default).
    #[default]
    Compact,
    /// Default tracing formatter.
    Full,
    /// Multi-line, development-oriented.
    Pretty,
    /// Structured JSON for log aggregators (requires the `json-log` feature).
    #[cfg(feature = "json-log")]
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base level for all targets.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Per-module level overrides, e.g. `{"courier_core" = "debug"}`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            filters: HashMap::new(),
        }
    }
}
