//! Route registry and first-match resolution.
//!
//! A [`Route`] pairs a [`Filter`] with a handler. The [`Router`] keeps an
//! ordered route list per update kind and resolves an incoming update to
//! the handler of the first route whose filter matches; registration order
//! is precedence, first match wins. Overlapping filters are tolerated
//! silently: the earlier registration shadows the later one.
//!
//! Unmatched **text messages** fall through to the registered fallback
//! handler (the catch-all echo/help prompt); unmatched callbacks and edited
//! messages resolve to nothing.
//!
//! Registration happens through explicit calls at startup:
//!
//! ```rust,ignore
//! let mut router = Router::new();
//! router.on_message(command("start"), handler_fn(cmd_start));
//! router.on_callback(callback("menu:main"), handler_fn(cb_main_menu));
//! router.fallback(handler_fn(echo));
//! ```

use std::sync::Arc;

use tracing::{debug, trace};

use crate::context::DispatchContext;
use crate::dispatcher::DispatchOutcome;
use crate::error::DispatchError;
use crate::filter::Filter;
use crate::handler::BoxedHandler;
use crate::update::{Update, UpdateKind};

/// A (filter, handler) registration.
pub struct Route {
    filter: Arc<dyn Filter>,
    handler: BoxedHandler,
    name: Option<String>,
}

impl Route {
    /// Creates a route from a filter and a handler.
    pub fn new<F>(filter: F, handler: BoxedHandler) -> Self
    where
        F: Filter + 'static,
    {
        Self {
            filter: Arc::new(filter),
            handler,
            name: None,
        }
    }

    /// Sets a name for this route (shows up in dispatch logs).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The route's name, if set.
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The route's handler.
    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }
}

/// Ordered route lists per update kind, plus the messages catch-all.
#[derive(Default)]
pub struct Router {
    message_routes: Vec<Route>,
    callback_routes: Vec<Route>,
    fallback: Option<BoxedHandler>,
}

impl Router {
    /// Creates an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a message route. Routes are matched in registration order.
    pub fn on_message<F>(&mut self, filter: F, handler: BoxedHandler) -> &mut Self
    where
        F: Filter + 'static,
    {
        self.message_routes.push(Route::new(filter, handler));
        self
    }

    /// Registers a callback-query route.
    pub fn on_callback<F>(&mut self, filter: F, handler: BoxedHandler) -> &mut Self
    where
        F: Filter + 'static,
    {
        self.callback_routes.push(Route::new(filter, handler));
        self
    }

    /// Registers a pre-built route for message updates.
    pub fn message_route(&mut self, route: Route) -> &mut Self {
        self.message_routes.push(route);
        self
    }

    /// Registers a pre-built route for callback-query updates.
    pub fn callback_route(&mut self, route: Route) -> &mut Self {
        self.callback_routes.push(route);
        self
    }

    /// Sets the catch-all handler for text messages no route matched.
    pub fn fallback(&mut self, handler: BoxedHandler) -> &mut Self {
        self.fallback = Some(handler);
        self
    }

    /// Number of registered routes across all kinds.
    pub fn route_count(&self) -> usize {
        self.message_routes.len() + self.callback_routes.len()
    }

    /// Resolves an update to the first matching route, or `None`.
    pub fn resolve(&self, update: &Update) -> Option<&Route> {
        let routes = match &update.kind {
            UpdateKind::Message(_) => &self.message_routes,
            UpdateKind::CallbackQuery(_) => &self.callback_routes,
            // Edits are observed (logged by the chain) but not routed.
            UpdateKind::EditedMessage(_) => return None,
        };
        routes.iter().find(|route| route.filter.matches(update))
    }

    /// Resolves and runs the handler for the context's update.
    ///
    /// Exactly one handler runs per update, or none: the first matching
    /// route's, else the fallback for unmatched text messages, else the
    /// update is reported [`DispatchOutcome::Unmatched`].
    pub async fn dispatch(&self, ctx: Arc<DispatchContext>) -> Result<DispatchOutcome, DispatchError> {
        if let Some(route) = self.resolve(ctx.update()) {
            trace!(
                route = route.get_name().unwrap_or("unnamed"),
                "route matched"
            );
            route.handler.call(ctx).await?;
            return Ok(DispatchOutcome::Handled);
        }

        let is_text_message =
            matches!(&ctx.update().kind, UpdateKind::Message(msg) if msg.text.is_some());
        if is_text_message {
            if let Some(fallback) = &self.fallback {
                debug!("no route matched, running messages catch-all");
                fallback.call(ctx).await?;
                return Ok(DispatchOutcome::Handled);
            }
        }

        debug!(kind = ctx.update().kind_name(), "no route matched");
        Ok(DispatchOutcome::Unmatched)
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("message_routes", &self.message_routes.len())
            .field("callback_routes", &self.callback_routes.len())
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{any_text, callback, callback_prefix, command};
    use crate::handler::handler_fn;
    use crate::testing::{
        NullRepository, RecordingResponder, callback_update, edited_update, message_update,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_handler(slot: Arc<AtomicUsize>, amount: usize) -> BoxedHandler {
        handler_fn(move |_ctx| {
            let slot = Arc::clone(&slot);
            async move {
                slot.fetch_add(amount, Ordering::SeqCst);
                Ok(())
            }
        })
    }

    fn ctx_for(update: Update) -> Arc<DispatchContext> {
        Arc::new(DispatchContext::new(
            update,
            Arc::new(RecordingResponder::default()),
            Arc::new(NullRepository),
        ))
    }

    #[test]
    fn resolve_returns_first_match_in_registration_order() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        router.message_route(
            Route::new(command("start"), counting_handler(Arc::clone(&hits), 1)).name("start"),
        );
        // Overlaps with the one above: any_text also matches "/start".
        router.message_route(
            Route::new(any_text(), counting_handler(Arc::clone(&hits), 10)).name("text"),
        );

        let update = message_update(1, 42, "/start");
        let route = router.resolve(&update).expect("should match");
        assert_eq!(route.get_name(), Some("start"));
    }

    #[test]
    fn resolve_walks_kinds_independently() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        router.on_message(command("start"), counting_handler(Arc::clone(&hits), 1));
        router.on_callback(callback("menu:main"), counting_handler(Arc::clone(&hits), 1));

        assert!(router.resolve(&message_update(1, 1, "/start")).is_some());
        assert!(router.resolve(&callback_update(2, 1, "menu:main")).is_some());
        // A callback filter never sees message updates and vice versa.
        assert!(router.resolve(&callback_update(3, 1, "/start")).is_none());
        assert!(router.resolve(&message_update(4, 1, "menu:main")).is_none());
    }

    #[tokio::test]
    async fn dispatch_runs_exactly_one_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        router.on_message(any_text(), counting_handler(Arc::clone(&hits), 1));
        router.on_message(any_text(), counting_handler(Arc::clone(&hits), 10));

        let outcome = router.dispatch(ctx_for(message_update(1, 1, "hi"))).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Handled);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unmatched_text_falls_through_to_catch_all() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        router.on_message(command("start"), counting_handler(Arc::clone(&hits), 1));
        router.fallback(counting_handler(Arc::clone(&hits), 100));

        let outcome = router
            .dispatch(ctx_for(message_update(1, 1, "just chatting")))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Handled);
        assert_eq!(hits.load(Ordering::SeqCst), 100);
    }

    #[tokio::test]
    async fn unmatched_callback_is_not_sent_to_catch_all() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        router.on_callback(callback_prefix("confirm:"), counting_handler(Arc::clone(&hits), 1));
        router.fallback(counting_handler(Arc::clone(&hits), 100));

        let outcome = router
            .dispatch(ctx_for(callback_update(1, 1, "menu:unknown")))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Unmatched);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn edited_messages_resolve_to_nothing() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        router.on_message(any_text(), counting_handler(Arc::clone(&hits), 1));
        router.fallback(counting_handler(Arc::clone(&hits), 100));

        let outcome = router
            .dispatch(ctx_for(edited_update(1, 1, "edited text")))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Unmatched);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handler_error_propagates() {
        let mut router = Router::new();
        router.on_message(
            any_text(),
            handler_fn(|_ctx| async { Err(DispatchError::handler("db down")) }),
        );

        let err = router
            .dispatch(ctx_for(message_update(1, 1, "hi")))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Handler(_)));
    }
}
