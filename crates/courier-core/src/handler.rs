//! Terminal handlers.
//!
//! A handler is the endpoint a routed update lands in. Handlers are stored
//! type-erased ([`BoxedHandler`]) so the router can hold a heterogeneous
//! ordered list; plain async functions become handlers via [`handler_fn`]:
//!
//! ```rust,ignore
//! async fn cmd_help(ctx: Arc<DispatchContext>) -> HandlerResult {
//!     let chat = ctx.update().chat_id().ok_or_else(|| DispatchError::handler("no chat"))?;
//!     ctx.responder().send_message(chat, Reply::text(HELP_TEXT)).await?;
//!     Ok(())
//! }
//!
//! router.on_message(command("help"), handler_fn(cmd_help));
//! ```
//!
//! Handler suspension points are collaborator calls (persistence, outbound
//! sends); the pipeline's own work around them never blocks.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::context::DispatchContext;
use crate::error::DispatchError;

/// What a handler returns: `Ok(())` or a propagated [`DispatchError`].
pub type HandlerResult = Result<(), DispatchError>;

/// A type-erased terminal handler.
pub trait Handler: Send + Sync {
    /// Runs the handler for one dispatch.
    fn call(&self, ctx: Arc<DispatchContext>) -> BoxFuture<'static, HandlerResult>;
}

/// A shareable handler reference, as stored in routes.
pub type BoxedHandler = Arc<dyn Handler>;

/// Wrapper turning an async function into a [`Handler`].
pub struct HandlerFn<F> {
    f: F,
}

impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Arc<DispatchContext>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, ctx: Arc<DispatchContext>) -> BoxFuture<'static, HandlerResult> {
        Box::pin((self.f)(ctx))
    }
}

/// Converts an async function or closure into a [`BoxedHandler`].
pub fn handler_fn<F, Fut>(f: F) -> BoxedHandler
where
    F: Fn(Arc<DispatchContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(HandlerFn { f })
}
