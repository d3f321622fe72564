//! Configuration loading, schema, and validation.

mod error;
mod loader;
mod schema;
mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile};
pub use schema::{
    BotMode, CourierConfig, LogFormat, LogLevel, LoggingConfig, TelegramConfig, ThrottleConfig,
    WebhookSettings,
};
pub use validation::validate_config;

/// Loads configuration from the default locations.
///
/// Searches the current directory and the user config directory, then
/// applies `COURIER_*` environment overrides.
pub fn load_config() -> ConfigResult<CourierConfig> {
    ConfigLoader::new()
        .with_current_dir()
        .with_user_config_dir()
        .load()
}
