//! Courier bot entry point.
//!
//! Loads configuration, assembles the dispatch pipeline (logging →
//! throttling → router) around the Bot API client, and runs it in the
//! configured mode:
//!
//! ```bash
//! COURIER_TELEGRAM__TOKEN=123:abc cargo run --package courier-bot
//! # or webhook mode
//! COURIER_TELEGRAM__MODE=webhook COURIER_WEBHOOK__PUBLIC_URL=https://example.com \
//!     cargo run --package courier-bot
//! ```

mod handlers;
mod keyboards;
mod storage;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::debug;

use courier_core::{Dispatcher, LoggingMiddleware, ThrottleGate, ThrottleMiddleware};
use courier_runtime::{BotRuntime, load_config};
use courier_telegram::BotCommand;

use crate::storage::MemoryUserStore;

/// How often idle throttle entries are swept, and how long a user must be
/// quiet before their entry goes.
const GATE_SWEEP_INTERVAL: Duration = Duration::from_secs(600);
const GATE_IDLE_HORIZON: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    let runtime = BotRuntime::new(config)?.with_commands(vec![
        BotCommand::new("start", "Main menu"),
        BotCommand::new("help", "Help"),
        BotCommand::new("settings", "Settings"),
    ]);

    let gate = Arc::new(ThrottleGate::new(runtime.config().throttle.rate()));
    spawn_gate_sweeper(Arc::clone(&gate));

    let throttle = match &runtime.config().throttle.notice {
        Some(notice) => ThrottleMiddleware::new(Arc::clone(&gate)).notice(notice.clone()),
        None => ThrottleMiddleware::new(Arc::clone(&gate)),
    };

    let dispatcher = Arc::new(
        Dispatcher::builder(runtime.api(), Arc::new(MemoryUserStore::new()))
            .router(handlers::build_router())
            .middleware(LoggingMiddleware::new())
            .middleware(throttle)
            .build(),
    );

    runtime.run(dispatcher).await?;
    Ok(())
}

/// Periodically drops throttle entries for users that went quiet, keeping
/// the map bounded over long uptimes.
fn spawn_gate_sweeper(gate: Arc<ThrottleGate>) {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(GATE_SWEEP_INTERVAL);
        tick.tick().await; // the first tick fires immediately
        loop {
            tick.tick().await;
            let removed = gate.evict_idle(GATE_IDLE_HORIZON, Instant::now());
            if removed > 0 {
                debug!(removed, "idle throttle entries evicted");
            }
        }
    });
}
