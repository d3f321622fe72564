//! Webhook transport.
//!
//! An axum server with two routes: the update endpoint (POST, validated
//! against the `X-Telegram-Bot-Api-Secret-Token` header when a secret is
//! configured) and a `/health` probe. Each accepted update is dispatched as
//! its own task; the endpoint answers 200 immediately so the Bot API does
//! not retry while a handler is still running.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use courier_core::Dispatcher;

use crate::error::WebhookError;
use crate::model::WireUpdate;

/// Header the Bot API echoes the configured secret in.
const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Webhook server settings.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Listen address, e.g. `0.0.0.0:8080`.
    pub bind_addr: String,
    /// Path the Bot API POSTs updates to.
    pub path: String,
    /// Shared secret; requests without the matching header are rejected.
    pub secret: Option<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            path: "/webhook".to_string(),
            secret: None,
        }
    }
}

struct ServerState {
    dispatcher: Arc<Dispatcher>,
    secret: Option<String>,
    tracker: TaskTracker,
}

/// The webhook receive loop feeding a shared [`Dispatcher`].
pub struct WebhookServer {
    dispatcher: Arc<Dispatcher>,
    config: WebhookConfig,
}

impl WebhookServer {
    /// Creates a webhook server.
    pub fn new(dispatcher: Arc<Dispatcher>, config: WebhookConfig) -> Self {
        Self { dispatcher, config }
    }

    /// Serves until `shutdown` fires, then drains in-flight dispatches.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<(), WebhookError> {
        let path = if self.config.path.starts_with('/') {
            self.config.path.clone()
        } else {
            format!("/{}", self.config.path)
        };

        let state = Arc::new(ServerState {
            dispatcher: Arc::clone(&self.dispatcher),
            secret: self.config.secret.clone(),
            tracker: TaskTracker::new(),
        });

        let router = axum::Router::new()
            .route(&path, post(receive_update))
            .route("/health", get(health))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr)
            .await
            .map_err(|err| WebhookError::Bind {
                addr: self.config.bind_addr.clone(),
                reason: err.to_string(),
            })?;

        info!(addr = %self.config.bind_addr, path = %path, "webhook server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
            .map_err(|err| WebhookError::Serve(err.to_string()))?;

        info!("webhook server stopped, draining in-flight dispatches");
        state.tracker.close();
        state.tracker.wait().await;
        Ok(())
    }
}

async fn receive_update(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(wire): Json<WireUpdate>,
) -> StatusCode {
    if let Some(expected) = &state.secret {
        let presented = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        if presented != Some(expected.as_str()) {
            warn!("webhook request with missing or wrong secret token");
            return StatusCode::UNAUTHORIZED;
        }
    }

    let update_id = wire.update_id;
    let Some(update) = wire.into_update() else {
        debug!(update_id, "skipping unconsumed update kind");
        return StatusCode::OK;
    };

    let dispatcher = Arc::clone(&state.dispatcher);
    state.tracker.spawn(async move {
        if let Err(err) = dispatcher.dispatch(update).await {
            error!(error = %err, "update dispatch failed");
        }
    });

    StatusCode::OK
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok", "mode": "webhook"}))
}
