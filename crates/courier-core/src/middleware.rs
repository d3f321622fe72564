//! Middleware chain around the router.
//!
//! A [`Middleware`] wraps everything after it in the chain, represented by
//! [`Next`]. Each layer may:
//!
//! - call `next.run(ctx)` and pass through,
//! - inspect or mutate the context bag, then continue,
//! - short-circuit by returning an outcome without calling `next.run`.
//!
//! The production composition is fixed: [`LoggingMiddleware`] outermost,
//! [`ThrottleMiddleware`] inside it, the router dispatch innermost. Keeping
//! throttling inside logging means dropped updates are still timed and
//! logged as a processed-with-`throttled` outcome, not as failures.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::context::DispatchContext;
use crate::dispatcher::DispatchOutcome;
use crate::error::DispatchError;
use crate::responder::Reply;
use crate::router::Router;
use crate::throttle::{Admission, ThrottleGate};
use crate::update::UpdateKind;

/// A cross-cutting layer wrapped around the router invocation.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Processes one dispatch. `next` is the rest of the chain; not running
    /// it drops the update from further processing.
    async fn handle(
        &self,
        ctx: Arc<DispatchContext>,
        next: Next<'_>,
    ) -> Result<DispatchOutcome, DispatchError>;
}

/// The remainder of the chain, ending at the router.
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    router: &'a Router,
}

impl<'a> Next<'a> {
    /// Creates the chain head over `chain` with `router` as the endpoint.
    pub(crate) fn new(chain: &'a [Arc<dyn Middleware>], router: &'a Router) -> Self {
        Self { chain, router }
    }

    /// Runs the rest of the chain.
    pub async fn run(self, ctx: Arc<DispatchContext>) -> Result<DispatchOutcome, DispatchError> {
        match self.chain.split_first() {
            Some((head, rest)) => {
                head.handle(
                    ctx,
                    Next {
                        chain: rest,
                        router: self.router,
                    },
                )
                .await
            }
            None => self.router.dispatch(ctx).await,
        }
    }
}

// ============================================================================
// Logging middleware
// ============================================================================

/// Outermost layer: brackets the chain with structured log events.
///
/// Emits exactly one `update_received` (debug) before the rest of the chain
/// runs, then exactly one of `update_processed` (info, with elapsed time
/// and outcome) or `update_failed` (error, with elapsed time and error
/// detail, the error re-propagated), never both.
#[derive(Debug, Default)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    /// Creates the logging layer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(
        &self,
        ctx: Arc<DispatchContext>,
        next: Next<'_>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let started = Instant::now();
        let user_id = ctx.from_user().map(|u| u.id.0);
        let kind = ctx.update().kind_name();
        let update_id = ctx.update().id;

        debug!(update_id, kind, user_id, "update_received");

        match next.run(Arc::clone(&ctx)).await {
            Ok(outcome) => {
                info!(
                    update_id,
                    kind,
                    user_id,
                    processing_ms = started.elapsed().as_millis() as u64,
                    outcome = outcome.as_str(),
                    "update_processed"
                );
                Ok(outcome)
            }
            Err(err) => {
                error!(
                    update_id,
                    kind,
                    user_id,
                    processing_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "update_failed"
                );
                Err(err)
            }
        }
    }
}

// ============================================================================
// Throttle middleware
// ============================================================================

/// Notice sent to a throttled user, unless overridden or disabled.
const DEFAULT_NOTICE: &str = "Too many requests — give it a moment.";

/// Per-user rate limiting layer over a shared [`ThrottleGate`].
///
/// Updates without an originating user pass straight through. A dropped
/// update short-circuits the chain with [`DispatchOutcome::Throttled`]: no
/// handler runs, no inner middleware observes it. The drop itself is an
/// info-level `throttled` event, plus a best-effort one-line notice back to
/// the user for message updates (a failed notice is logged, never
/// propagated).
pub struct ThrottleMiddleware {
    gate: Arc<ThrottleGate>,
    notice: Option<String>,
}

impl ThrottleMiddleware {
    /// Creates the throttling layer over a shared gate.
    pub fn new(gate: Arc<ThrottleGate>) -> Self {
        Self {
            gate,
            notice: Some(DEFAULT_NOTICE.to_string()),
        }
    }

    /// Overrides the notice text sent to throttled users.
    pub fn notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    /// Drops updates silently, without any user-facing notice.
    pub fn without_notice(mut self) -> Self {
        self.notice = None;
        self
    }
}

#[async_trait]
impl Middleware for ThrottleMiddleware {
    async fn handle(
        &self,
        ctx: Arc<DispatchContext>,
        next: Next<'_>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let user_id = match ctx.from_user() {
            Some(user) => user.id,
            // Updates without a user (e.g. channel posts) are not throttled.
            None => return next.run(ctx).await,
        };

        match self.gate.admit_now(user_id) {
            Admission::Admitted => next.run(ctx).await,
            Admission::Dropped { since_last } => {
                info!(
                    user_id = user_id.0,
                    since_last_ms = since_last.as_millis() as u64,
                    "throttled"
                );

                if let Some(notice) = &self.notice
                    && let UpdateKind::Message(msg) = &ctx.update().kind
                    && let Err(err) = ctx
                        .responder()
                        .send_message(msg.chat, Reply::text(notice.clone()))
                        .await
                {
                    warn!(user_id = user_id.0, error = %err, "throttle notice delivery failed");
                }

                Ok(DispatchOutcome::Throttled)
            }
        }
    }
}
