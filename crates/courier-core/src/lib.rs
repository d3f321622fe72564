//! # Courier Core
//!
//! The update-dispatch pipeline of the Courier Telegram bot.
//!
//! Every inbound [`Update`] flows through the same path:
//!
//! ```text
//! ┌───────────┐     ┌────────────┐     ┌─────────┐   ┌──────────┐   ┌────────┐
//! │ Transport │────▶│ Dispatcher │────▶│ Logging │──▶│ Throttle │──▶│ Router │──▶ Handler
//! │ (poll/web │     │ (fresh ctx │     │  layer  │   │  layer   │   │ (first │
//! │   hook)   │     │ per update)│     └─────────┘   └──────────┘   │ match) │
//! └───────────┘     └────────────┘                                  └────────┘
//! ```
//!
//! - **Filters** ([`filter`]) are pure predicates routes are keyed by.
//! - The **throttle gate** ([`throttle`]) is per-user minimum-interval
//!   admission control with an explicit [`Admission`] result.
//! - The **router** ([`router`]) resolves the first matching route in
//!   registration order; unmatched text falls through to a catch-all.
//! - **Middleware** ([`middleware`]) wrap the router invocation and may
//!   short-circuit; logging is outermost, throttling inside it.
//! - The **dispatcher** ([`dispatcher`]) is the per-update entry point and
//!   the error-containment boundary.
//!
//! The pipeline owns no I/O. Persistence ([`repository`]) and outbound
//! replies ([`responder`]) are collaborator traits the application wires in;
//! suspension points live in handlers, not in the pipeline's own work.
//!
//! Exactly one handler runs per update, or none when the update is
//! throttled or nothing matches.

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod handler;
pub mod middleware;
pub mod repository;
pub mod responder;
pub mod router;
pub mod throttle;
pub mod update;

#[cfg(test)]
pub(crate) mod testing;

pub use context::DispatchContext;
pub use dispatcher::{DispatchOutcome, Dispatcher, DispatcherBuilder};
pub use error::{DispatchError, PayloadError, RepositoryError, SendError};
pub use filter::{Filter, FilterExt, any_text, callback, callback_prefix, command};
pub use handler::{BoxedHandler, Handler, HandlerResult, handler_fn};
pub use middleware::{LoggingMiddleware, Middleware, Next, ThrottleMiddleware};
pub use repository::{UserRecord, UserRepository, UserRole};
pub use responder::{Button, ButtonAction, Keyboard, Reply, Responder};
pub use router::{Route, Router};
pub use throttle::{Admission, DEFAULT_RATE, ThrottleGate};
pub use update::{
    CallbackData, CallbackQuery, ChatId, Message, Sender, Update, UpdateKind, UserId,
};
