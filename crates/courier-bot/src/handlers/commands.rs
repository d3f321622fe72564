//! Command handlers: `/start`, `/help`, `/settings`.
//!
//! Adding a command: write an async handler here, then register it with a
//! `command("name")` filter in [`super::build_router`].

use std::sync::Arc;

use tracing::info;

use courier_core::{DispatchContext, HandlerResult, Reply};

use crate::keyboards;

/// `/start` — upsert the user and show the main menu.
pub async fn cmd_start(ctx: Arc<DispatchContext>) -> HandlerResult {
    let Some(user) = ctx.from_user().cloned() else {
        return Ok(());
    };
    let Some(chat) = ctx.update().chat_id() else {
        return Ok(());
    };

    let (record, created) = ctx.users().upsert(&user).await?;
    info!(user_id = user.id.0, new_user = created, "start_command");

    let greeting = if created { "Welcome" } else { "Welcome back" };
    ctx.responder()
        .send_message(
            chat,
            Reply::text(format!(
                "{greeting}, <b>{}</b>! 👋\n\nPick an action:",
                record.full_name()
            ))
            .keyboard(keyboards::main_menu()),
        )
        .await?;
    Ok(())
}

/// `/help` — list the available commands.
pub async fn cmd_help(ctx: Arc<DispatchContext>) -> HandlerResult {
    let Some(chat) = ctx.update().chat_id() else {
        return Ok(());
    };

    let help_text = "<b>Available commands:</b>\n\n\
        /start — main menu\n\
        /help — this help\n\
        /settings — settings";
    ctx.responder()
        .send_message(chat, Reply::text(help_text))
        .await?;
    Ok(())
}

/// `/settings` — placeholder for user preferences.
pub async fn cmd_settings(ctx: Arc<DispatchContext>) -> HandlerResult {
    let Some(chat) = ctx.update().chat_id() else {
        return Ok(());
    };

    ctx.responder()
        .send_message(
            chat,
            Reply::text("⚙️ <b>Settings</b>\n\nNothing to configure yet."),
        )
        .await?;
    Ok(())
}
