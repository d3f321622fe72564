//! The top-level dispatch entry point.
//!
//! A [`Dispatcher`] is built once at startup from a router, an ordered
//! middleware list, and the collaborator handles, then shared (via `Arc`)
//! with every transport. Each received update gets one
//! [`Dispatcher::dispatch`] call; transports run those calls as independent
//! tasks, so dispatches for different updates may overlap freely.
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::builder(responder, users)
//!     .router(router)
//!     .middleware(LoggingMiddleware::new())
//!     .middleware(ThrottleMiddleware::new(gate))
//!     .build();
//!
//! if let Err(err) = dispatcher.dispatch(update).await {
//!     // One bad update never kills the loop.
//!     error!(error = %err, "update dispatch failed");
//! }
//! ```

use std::sync::Arc;

use tracing::Instrument;

use crate::context::DispatchContext;
use crate::error::DispatchError;
use crate::middleware::{Middleware, Next};
use crate::repository::UserRepository;
use crate::responder::Responder;
use crate::router::Router;
use crate::update::Update;

/// How a dispatch ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Exactly one handler ran.
    Handled,
    /// No route matched and the catch-all did not apply.
    Unmatched,
    /// The throttle gate dropped the update; no handler ran.
    Throttled,
}

impl DispatchOutcome {
    /// Stable lowercase name, used in log events.
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Handled => "handled",
            DispatchOutcome::Unmatched => "unmatched",
            DispatchOutcome::Throttled => "throttled",
        }
    }
}

/// The assembled pipeline: middleware chain around a router.
pub struct Dispatcher {
    middlewares: Vec<Arc<dyn Middleware>>,
    router: Router,
    responder: Arc<dyn Responder>,
    users: Arc<dyn UserRepository>,
}

impl Dispatcher {
    /// Starts building a dispatcher around the given collaborators.
    pub fn builder(
        responder: Arc<dyn Responder>,
        users: Arc<dyn UserRepository>,
    ) -> DispatcherBuilder {
        DispatcherBuilder {
            middlewares: Vec::new(),
            router: Router::new(),
            responder,
            users,
        }
    }

    /// Dispatches one update through the middleware chain.
    ///
    /// Builds a fresh [`DispatchContext`], runs the chain head, and
    /// propagates any error to the caller; the logging layer has already
    /// recorded it; the caller decides whether to continue the loop
    /// (production default) or crash.
    pub async fn dispatch(&self, update: Update) -> Result<DispatchOutcome, DispatchError> {
        let span =
            tracing::debug_span!("dispatch", update_id = update.id, kind = update.kind_name());

        async {
            let ctx = Arc::new(DispatchContext::new(
                update,
                Arc::clone(&self.responder),
                Arc::clone(&self.users),
            ));
            Next::new(&self.middlewares, &self.router).run(ctx).await
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("middlewares", &self.middlewares.len())
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Dispatcher`].
pub struct DispatcherBuilder {
    middlewares: Vec<Arc<dyn Middleware>>,
    router: Router,
    responder: Arc<dyn Responder>,
    users: Arc<dyn UserRepository>,
}

impl DispatcherBuilder {
    /// Sets the router the chain ends at.
    pub fn router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    /// Appends a middleware layer. The first layer added is the outermost.
    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware + 'static,
    {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Finishes the build.
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            middlewares: self.middlewares,
            router: self.router,
            responder: self.responder,
            users: self.users,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DispatchError;
    use crate::filter::{any_text, callback_prefix, command};
    use crate::handler::handler_fn;
    use crate::middleware::{LoggingMiddleware, ThrottleMiddleware};
    use crate::testing::{
        NullRepository, RecordingResponder, callback_update, message_update,
    };
    use crate::throttle::ThrottleGate;
    use crate::update::CallbackData;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_router(hits: Arc<AtomicUsize>) -> Router {
        let mut router = Router::new();
        router.on_message(
            any_text(),
            handler_fn(move |_ctx| {
                let hits = Arc::clone(&hits);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }),
        );
        router
    }

    #[tokio::test]
    async fn burst_from_one_user_is_gated_then_readmitted() {
        // rate 300ms: A admitted, B right behind it dropped with one notice,
        // C after the window admitted again.
        let hits = Arc::new(AtomicUsize::new(0));
        let responder = Arc::new(RecordingResponder::default());
        let gate = Arc::new(ThrottleGate::new(Duration::from_millis(300)));

        let responder_dyn: Arc<dyn Responder> = responder.clone();
        let dispatcher = Dispatcher::builder(responder_dyn, Arc::new(NullRepository))
            .router(counting_router(Arc::clone(&hits)))
            .middleware(LoggingMiddleware::new())
            .middleware(ThrottleMiddleware::new(gate))
            .build();

        let a = dispatcher.dispatch(message_update(1, 42, "A")).await.unwrap();
        let b = dispatcher.dispatch(message_update(2, 42, "B")).await.unwrap();
        assert_eq!(a, DispatchOutcome::Handled);
        assert_eq!(b, DispatchOutcome::Throttled);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(responder.sent.lock().len(), 1);

        tokio::time::sleep(Duration::from_millis(350)).await;

        let c = dispatcher.dispatch(message_update(3, 42, "C")).await.unwrap();
        assert_eq!(c, DispatchOutcome::Handled);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn different_users_inside_the_window_are_both_admitted() {
        let hits = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(ThrottleGate::new(Duration::from_secs(5)));

        let dispatcher = Dispatcher::builder(
            Arc::new(RecordingResponder::default()),
            Arc::new(NullRepository),
        )
        .router(counting_router(Arc::clone(&hits)))
        .middleware(LoggingMiddleware::new())
        .middleware(ThrottleMiddleware::new(gate))
        .build();

        let first = dispatcher.dispatch(message_update(1, 1, "hi")).await.unwrap();
        let second = dispatcher.dispatch(message_update(2, 2, "hi")).await.unwrap();
        assert_eq!(first, DispatchOutcome::Handled);
        assert_eq!(second, DispatchOutcome::Handled);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_dispatch_does_not_poison_the_next_one() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in = Arc::clone(&hits);

        let mut router = Router::new();
        router.on_message(
            command("boom"),
            handler_fn(|_ctx| async { Err(DispatchError::handler("kaput")) }),
        );
        router.on_message(
            any_text(),
            handler_fn(move |_ctx| {
                let hits = Arc::clone(&hits_in);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }),
        );

        let dispatcher = Dispatcher::builder(
            Arc::new(RecordingResponder::default()),
            Arc::new(NullRepository),
        )
        .router(router)
        .middleware(LoggingMiddleware::new())
        .build();

        let err = dispatcher.dispatch(message_update(1, 1, "/boom")).await;
        assert!(err.is_err());

        // The next update from the same loop is processed normally.
        let ok = dispatcher.dispatch(message_update(2, 1, "hello")).await.unwrap();
        assert_eq!(ok, DispatchOutcome::Handled);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn callback_payload_reaches_its_handler_parsed() {
        let parsed = Arc::new(parking_lot::Mutex::new(None));
        let parsed_in = Arc::clone(&parsed);

        let mut router = Router::new();
        router.on_callback(
            callback_prefix("confirm:"),
            handler_fn(move |ctx| {
                let parsed = Arc::clone(&parsed_in);
                async move {
                    let raw = ctx.update().text().unwrap_or_default().to_string();
                    let data = CallbackData::parse(&raw)?;
                    *parsed.lock() =
                        Some((data.action.to_string(), data.payload.unwrap_or("").to_string()));
                    Ok(())
                }
            }),
        );

        let dispatcher = Dispatcher::builder(
            Arc::new(RecordingResponder::default()),
            Arc::new(NullRepository),
        )
        .router(router)
        .build();

        let outcome = dispatcher
            .dispatch(callback_update(1, 42, "confirm:yes:delete"))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Handled);
        assert_eq!(
            parsed.lock().clone(),
            Some(("yes".to_string(), "delete".to_string()))
        );
    }
}
