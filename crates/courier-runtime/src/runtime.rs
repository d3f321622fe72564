//! Bot lifecycle orchestration.
//!
//! [`BotRuntime`] wires a built [`Dispatcher`] to the transport selected by
//! configuration and manages the lifecycle around it: logging init, command
//! menu registration, webhook registration/removal, and graceful shutdown
//! on Ctrl-C / SIGTERM. In-flight dispatches are drained by the transports
//! before `run` returns.
//!
//! ```rust,ignore
//! let config = config::load_config()?;
//! let runtime = BotRuntime::new(config)?;
//!
//! let dispatcher = build_dispatcher(runtime.api());
//! runtime.run(dispatcher).await?;
//! ```

use std::sync::Arc;

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use courier_core::Dispatcher;
use courier_telegram::{
    BotCommand, PollingTransport, TelegramApi, WebhookConfig, WebhookServer,
};

use crate::config::{BotMode, CourierConfig, validate_config};
use crate::error::RuntimeResult;
use crate::logging;

/// The orchestration layer around one bot process.
pub struct BotRuntime {
    config: CourierConfig,
    api: Arc<TelegramApi>,
    commands: Vec<BotCommand>,
}

impl BotRuntime {
    /// Creates a runtime from validated configuration.
    ///
    /// Initializes logging (tolerating an already-installed subscriber) and
    /// constructs the Bot API client the application should also hand to
    /// its dispatcher as the responder.
    pub fn new(config: CourierConfig) -> RuntimeResult<Self> {
        logging::init_from_config(&config.logging);
        validate_config(&config)?;

        let api = Arc::new(TelegramApi::with_api_url(
            &config.telegram.api_url,
            &config.telegram.token,
        ));

        Ok(Self {
            config,
            api,
            commands: Vec::new(),
        })
    }

    /// The shared Bot API client.
    pub fn api(&self) -> Arc<TelegramApi> {
        Arc::clone(&self.api)
    }

    /// The loaded configuration.
    pub fn config(&self) -> &CourierConfig {
        &self.config
    }

    /// Sets the command menu registered at startup.
    pub fn with_commands(mut self, commands: Vec<BotCommand>) -> Self {
        self.commands = commands;
        self
    }

    /// Runs the bot until a shutdown signal arrives.
    pub async fn run(&self, dispatcher: Arc<Dispatcher>) -> RuntimeResult<()> {
        let mode = self.config.telegram.mode;
        info!(mode = mode.as_str(), "bot_started");

        if !self.commands.is_empty()
            && let Err(err) = self.api.set_my_commands(&self.commands).await
        {
            // The menu is cosmetic; a failure here must not stop startup.
            warn!(error = %err, "failed to register command menu");
        }

        let shutdown = CancellationToken::new();
        spawn_signal_listener(shutdown.clone());

        match mode {
            BotMode::Polling => self.run_polling(dispatcher, shutdown).await?,
            BotMode::Webhook => self.run_webhook(dispatcher, shutdown).await?,
        }

        info!("bot_stopped");
        Ok(())
    }

    async fn run_polling(
        &self,
        dispatcher: Arc<Dispatcher>,
        shutdown: CancellationToken,
    ) -> RuntimeResult<()> {
        let transport = PollingTransport::new(self.api(), dispatcher);
        transport.run(shutdown).await?;
        Ok(())
    }

    async fn run_webhook(
        &self,
        dispatcher: Arc<Dispatcher>,
        shutdown: CancellationToken,
    ) -> RuntimeResult<()> {
        let webhook = &self.config.webhook;
        // Validation guarantees a public URL in webhook mode.
        if let Some(url) = webhook.external_url() {
            self.api
                .set_webhook(&url, webhook.secret.as_deref(), true)
                .await?;
            info!(url = %url, "webhook_set");
        }

        let server = WebhookServer::new(
            dispatcher,
            WebhookConfig {
                bind_addr: webhook.bind_addr(),
                path: webhook.path.clone(),
                secret: webhook.secret.clone(),
            },
        );
        let result = server.run(shutdown).await;

        info!("bot_stopping");
        if let Err(err) = self.api.delete_webhook().await {
            warn!(error = %err, "failed to remove webhook registration");
        }

        result?;
        Ok(())
    }
}

/// Cancels `token` on Ctrl-C or SIGTERM.
fn spawn_signal_listener(token: CancellationToken) {
    tokio::spawn(async move {
        wait_for_shutdown().await;
        token.cancel();
    });
}

async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(err) => {
                warn!(error = %err, "failed to register SIGTERM handler");
                if signal::ctrl_c().await.is_ok() {
                    info!("received Ctrl+C, shutting down");
                }
                return;
            }
        };

        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("received Ctrl+C, shutting down");
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, shutting down");
        }
    }
}
