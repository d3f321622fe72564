//! Long-polling transport.
//!
//! Pulls update batches with `getUpdates`, acknowledges them through the
//! offset cursor, and dispatches each update as its own task. Dispatches
//! from one batch (and across batches) run concurrently; ordering
//! guarantees live in the pipeline (per-user throttling), not here.
//!
//! On shutdown the loop stops fetching and waits for in-flight dispatches
//! to finish; no hard preemption of running handlers.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, trace, warn};

use courier_core::Dispatcher;

use crate::api::TelegramApi;
use crate::error::ApiError;

/// Polling behavior knobs.
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Long-poll wait passed to `getUpdates`.
    pub timeout_secs: u64,
    /// Update kinds requested from the Bot API.
    pub allowed_updates: Vec<String>,
    /// Pause after a failed fetch before retrying.
    pub error_backoff: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            allowed_updates: vec![
                "message".to_string(),
                "edited_message".to_string(),
                "callback_query".to_string(),
            ],
            error_backoff: Duration::from_secs(5),
        }
    }
}

/// The long-poll fetch loop feeding a shared [`Dispatcher`].
pub struct PollingTransport {
    api: Arc<TelegramApi>,
    dispatcher: Arc<Dispatcher>,
    config: PollingConfig,
}

impl PollingTransport {
    /// Creates a transport with default polling behavior.
    pub fn new(api: Arc<TelegramApi>, dispatcher: Arc<Dispatcher>) -> Self {
        Self::with_config(api, dispatcher, PollingConfig::default())
    }

    /// Creates a transport with explicit polling behavior.
    pub fn with_config(
        api: Arc<TelegramApi>,
        dispatcher: Arc<Dispatcher>,
        config: PollingConfig,
    ) -> Self {
        Self {
            api,
            dispatcher,
            config,
        }
    }

    /// Runs the fetch loop until `shutdown` fires, then drains in-flight
    /// dispatches.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<(), ApiError> {
        let mut offset: Option<i64> = None;
        let tracker = TaskTracker::new();

        info!(timeout_secs = self.config.timeout_secs, "polling started");

        loop {
            let batch = tokio::select! {
                _ = shutdown.cancelled() => break,
                result = self.api.get_updates(
                    offset,
                    self.config.timeout_secs,
                    &self.config.allowed_updates,
                ) => match result {
                    Ok(batch) => batch,
                    Err(err) => {
                        warn!(error = %err, "getUpdates failed, backing off");
                        tokio::select! {
                            _ = shutdown.cancelled() => break,
                            _ = tokio::time::sleep(self.config.error_backoff) => continue,
                        }
                    }
                },
            };

            if !batch.is_empty() {
                debug!(count = batch.len(), "received update batch");
            }

            for wire in batch {
                // Acknowledge before converting: even kinds the pipeline
                // does not consume must not be redelivered after a restart.
                offset = Some(advance_offset(offset, wire.update_id));

                let Some(update) = wire.into_update() else {
                    trace!("skipping unconsumed update kind");
                    continue;
                };

                let dispatcher = Arc::clone(&self.dispatcher);
                tracker.spawn(async move {
                    if let Err(err) = dispatcher.dispatch(update).await {
                        error!(error = %err, "update dispatch failed");
                    }
                });
            }
        }

        info!("polling stopped, draining in-flight dispatches");
        tracker.close();
        tracker.wait().await;
        Ok(())
    }
}

/// Next acknowledgement cursor after seeing `update_id`.
///
/// `getUpdates` batches arrive in id order, but the max guards against a
/// server replaying an already-acknowledged id.
fn advance_offset(offset: Option<i64>, update_id: i64) -> i64 {
    offset.unwrap_or(i64::MIN).max(update_id + 1)
}
