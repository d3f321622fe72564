//! Handler registry.
//!
//! [`build_router`] wires every handler to its filter. Order matters:
//! commands are registered before the callback routes and the free-text
//! catch-all is the fallback, so a `/start` message never reaches the echo
//! handler.

pub mod callbacks;
pub mod commands;
pub mod messages;

use courier_core::{Route, Router, callback, callback_prefix, command, handler_fn};

/// Builds the bot's route table.
pub fn build_router() -> Router {
    let mut router = Router::new();

    router.message_route(
        Route::new(command("start"), handler_fn(commands::cmd_start)).name("cmd_start"),
    );
    router.message_route(
        Route::new(command("help"), handler_fn(commands::cmd_help)).name("cmd_help"),
    );
    router.message_route(
        Route::new(command("settings"), handler_fn(commands::cmd_settings)).name("cmd_settings"),
    );

    router.callback_route(
        Route::new(callback("menu:main"), handler_fn(callbacks::cb_main_menu)).name("cb_main_menu"),
    );
    router.callback_route(
        Route::new(callback("menu:profile"), handler_fn(callbacks::cb_profile)).name("cb_profile"),
    );
    router.callback_route(
        Route::new(callback("menu:help"), handler_fn(callbacks::cb_help)).name("cb_help"),
    );
    router.callback_route(
        Route::new(callback("menu:settings"), handler_fn(callbacks::cb_settings))
            .name("cb_settings"),
    );
    router.callback_route(
        Route::new(callback_prefix("confirm:"), handler_fn(callbacks::cb_confirm))
            .name("cb_confirm"),
    );
    router.callback_route(Route::new(callback("noop"), handler_fn(callbacks::cb_noop)).name("cb_noop"));

    router.fallback(handler_fn(messages::echo));

    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryUserStore;
    use crate::testing::{RecordingResponder, callback_update, message_update};
    use courier_core::{DispatchOutcome, Dispatcher, UserId, UserRepository};
    use std::sync::Arc;

    fn dispatcher(
        responder: Arc<RecordingResponder>,
        users: Arc<MemoryUserStore>,
    ) -> Dispatcher {
        Dispatcher::builder(responder, users)
            .router(build_router())
            .build()
    }

    #[tokio::test]
    async fn start_persists_the_user_and_greets_with_menu() {
        let responder = Arc::new(RecordingResponder::default());
        let users = Arc::new(MemoryUserStore::new());
        let dispatcher = dispatcher(Arc::clone(&responder), Arc::clone(&users));

        let outcome = dispatcher
            .dispatch(message_update(1, 42, "/start"))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Handled);

        let record = users
            .get_by_telegram_id(UserId(42))
            .await
            .unwrap()
            .expect("user persisted");
        assert_eq!(record.telegram_id, UserId(42));

        let sent = responder.sent.lock();
        assert_eq!(sent.len(), 1);
        let (_, reply) = &sent[0];
        assert!(reply.text.starts_with("Welcome,"));
        assert!(reply.keyboard.is_some());
    }

    #[tokio::test]
    async fn second_start_greets_back_without_duplicating() {
        let responder = Arc::new(RecordingResponder::default());
        let users = Arc::new(MemoryUserStore::new());
        let dispatcher = dispatcher(Arc::clone(&responder), Arc::clone(&users));

        dispatcher.dispatch(message_update(1, 42, "/start")).await.unwrap();
        dispatcher.dispatch(message_update(2, 42, "/start")).await.unwrap();

        assert_eq!(users.count_active().await.unwrap(), 1);
        let sent = responder.sent.lock();
        assert!(sent[1].1.text.starts_with("Welcome back,"));
    }

    #[tokio::test]
    async fn profile_callback_edits_in_the_stored_card() {
        let responder = Arc::new(RecordingResponder::default());
        let users = Arc::new(MemoryUserStore::new());
        let dispatcher = dispatcher(Arc::clone(&responder), Arc::clone(&users));

        dispatcher.dispatch(message_update(1, 42, "/start")).await.unwrap();
        dispatcher
            .dispatch(callback_update(2, 42, "menu:profile"))
            .await
            .unwrap();

        let edited = responder.edited.lock();
        assert_eq!(edited.len(), 1);
        assert!(edited[0].2.text.contains("Profile"));
        assert!(edited[0].2.text.contains("@user42"));
        // The query was acknowledged.
        assert_eq!(responder.answered.lock().len(), 1);
    }

    #[tokio::test]
    async fn profile_callback_for_unknown_user_alerts() {
        let responder = Arc::new(RecordingResponder::default());
        let dispatcher = dispatcher(Arc::clone(&responder), Arc::new(MemoryUserStore::new()));

        dispatcher
            .dispatch(callback_update(1, 7, "menu:profile"))
            .await
            .unwrap();

        let answered = responder.answered.lock();
        assert_eq!(answered.len(), 1);
        assert_eq!(answered[0].1.as_deref(), Some("User not found"));
        assert!(answered[0].2, "should be an alert");
        assert!(responder.edited.lock().is_empty());
    }

    #[tokio::test]
    async fn confirm_callback_parses_choice_and_action() {
        let responder = Arc::new(RecordingResponder::default());
        let dispatcher = dispatcher(Arc::clone(&responder), Arc::new(MemoryUserStore::new()));

        dispatcher
            .dispatch(callback_update(1, 42, "confirm:yes:delete"))
            .await
            .unwrap();
        dispatcher
            .dispatch(callback_update(2, 42, "confirm:no:delete"))
            .await
            .unwrap();

        let answered = responder.answered.lock();
        assert_eq!(answered[0].1.as_deref(), Some("Action 'delete' confirmed"));
        assert_eq!(answered[1].1.as_deref(), Some("Cancelled"));
    }

    #[tokio::test]
    async fn malformed_confirm_payload_is_answered_neutrally() {
        let responder = Arc::new(RecordingResponder::default());
        let dispatcher = dispatcher(Arc::clone(&responder), Arc::new(MemoryUserStore::new()));

        // Matches the "confirm:" prefix route but has an empty action.
        let outcome = dispatcher
            .dispatch(callback_update(1, 42, "confirm:"))
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Handled);
        let answered = responder.answered.lock();
        assert_eq!(answered[0].1.as_deref(), Some("This button no longer works"));
    }

    #[tokio::test]
    async fn free_text_falls_through_to_echo() {
        let responder = Arc::new(RecordingResponder::default());
        let dispatcher = dispatcher(Arc::clone(&responder), Arc::new(MemoryUserStore::new()));

        let outcome = dispatcher
            .dispatch(message_update(1, 42, "hello there"))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Handled);

        let sent = responder.sent.lock();
        assert!(sent[0].1.text.contains("hello there"));
        assert!(sent[0].1.keyboard.is_some());
    }

    #[tokio::test]
    async fn unknown_command_still_reaches_echo_fallback() {
        let responder = Arc::new(RecordingResponder::default());
        let dispatcher = dispatcher(Arc::clone(&responder), Arc::new(MemoryUserStore::new()));

        let outcome = dispatcher
            .dispatch(message_update(1, 42, "/frobnicate"))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Handled);
        assert!(responder.sent.lock()[0].1.text.contains("/frobnicate"));
    }
}
