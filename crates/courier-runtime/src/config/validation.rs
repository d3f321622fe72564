//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BotMode, CourierConfig, WebhookSettings};

/// Validates the entire configuration.
pub fn validate_config(config: &CourierConfig) -> ConfigResult<()> {
    if config.telegram.token.trim().is_empty() {
        return Err(ConfigError::missing_field("telegram.token"));
    }

    if config.telegram.api_url.trim().is_empty() {
        return Err(ConfigError::missing_field("telegram.api_url"));
    }

    if config.telegram.mode == BotMode::Webhook {
        validate_webhook(&config.webhook)?;
    }

    Ok(())
}

fn validate_webhook(webhook: &WebhookSettings) -> ConfigResult<()> {
    let Some(public_url) = &webhook.public_url else {
        return Err(ConfigError::missing_field("webhook.public_url"));
    };

    if !public_url.starts_with("https://") {
        return Err(ConfigError::validation(format!(
            "webhook.public_url must be an https:// URL, got '{public_url}'"
        )));
    }

    if !webhook.path.starts_with('/') {
        return Err(ConfigError::validation(format!(
            "webhook.path must start with '/', got '{}'",
            webhook.path
        )));
    }

    if webhook.bind_port == 0 {
        return Err(ConfigError::validation("webhook.bind_port must be non-zero"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> CourierConfig {
        let mut config = CourierConfig::default();
        config.telegram.token = "123:abc".to_string();
        config
    }

    #[test]
    fn accepts_minimal_polling_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn rejects_empty_token() {
        let config = CourierConfig::default();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field } if field == "telegram.token"));
    }

    #[test]
    fn webhook_mode_requires_public_url() {
        let mut config = valid_config();
        config.telegram.mode = BotMode::Webhook;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field } if field == "webhook.public_url"));
    }

    #[test]
    fn webhook_public_url_must_be_https() {
        let mut config = valid_config();
        config.telegram.mode = BotMode::Webhook;
        config.webhook.public_url = Some("http://example.com".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn webhook_path_must_be_absolute() {
        let mut config = valid_config();
        config.telegram.mode = BotMode::Webhook;
        config.webhook.public_url = Some("https://example.com".to_string());
        config.webhook.path = "webhook".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn external_url_joins_base_and_path() {
        let mut config = valid_config();
        config.webhook.public_url = Some("https://example.com/".to_string());
        assert_eq!(
            config.webhook.external_url().as_deref(),
            Some("https://example.com/webhook")
        );
    }
}
