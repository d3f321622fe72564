//! Per-dispatch context.
//!
//! One [`DispatchContext`] is created per incoming update and shared (via
//! `Arc`) by every middleware layer and the terminal handler. It carries the
//! update itself, handles to the collaborators handlers need, and a typed
//! key-value state bag middleware layers use to pass data inward (e.g. the
//! resolved user record). The context is scoped to a single dispatch and
//! discarded afterwards.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::repository::UserRepository;
use crate::responder::Responder;
use crate::update::{Sender, Update};

/// The context object threaded through one dispatch.
///
/// # Thread safety
///
/// The context is shared across the chain inside an `Arc`; the state bag is
/// mutex-guarded so layers may write to it through a shared reference.
///
/// # Example
///
/// ```rust,ignore
/// async fn handle(ctx: Arc<DispatchContext>) -> HandlerResult {
///     let chat = ctx.update().chat_id().expect("message update");
///     ctx.responder().send_message(chat, Reply::text("hi")).await?;
///     Ok(())
/// }
/// ```
pub struct DispatchContext {
    update: Update,
    responder: Arc<dyn Responder>,
    users: Arc<dyn UserRepository>,
    /// Typed key-value bag; one value per type, scoped to this dispatch.
    state: Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl DispatchContext {
    /// Creates a fresh context for one update.
    pub fn new(
        update: Update,
        responder: Arc<dyn Responder>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            update,
            responder,
            users,
            state: Mutex::new(HashMap::new()),
        }
    }

    /// The update being dispatched.
    pub fn update(&self) -> &Update {
        &self.update
    }

    /// The originating user, if the update carries one.
    pub fn from_user(&self) -> Option<&Sender> {
        self.update.from_user()
    }

    /// The outbound-reply collaborator.
    pub fn responder(&self) -> &Arc<dyn Responder> {
        &self.responder
    }

    /// The user-persistence collaborator.
    pub fn users(&self) -> &Arc<dyn UserRepository> {
        &self.users
    }

    /// Stores a value in the state bag. One value per type; subsequent
    /// calls for the same type overwrite.
    pub fn set_state<T: Send + Sync + 'static>(&self, value: T) {
        self.state.lock().insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a cloned value from the state bag.
    pub fn get_state<T: Clone + 'static>(&self) -> Option<T> {
        self.state
            .lock()
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
            .cloned()
    }

    /// Returns `true` if a value of type `T` is in the bag.
    pub fn has_state<T: 'static>(&self) -> bool {
        self.state.lock().contains_key(&TypeId::of::<T>())
    }

    /// Removes and returns a value from the bag.
    pub fn take_state<T: 'static>(&self) -> Option<T> {
        self.state
            .lock()
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast::<T>().ok())
            .map(|v| *v)
    }
}

impl std::fmt::Debug for DispatchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchContext")
            .field("update", &self.update)
            .finish_non_exhaustive()
    }
}
