//! Callback query handlers for the inline keyboards.
//!
//! Callback data follows the `"prefix:action[:payload]"` convention from
//! [`crate::keyboards`]. Every handler acknowledges its query; an
//! unanswered callback leaves the client's button spinner running.

use std::sync::Arc;

use tracing::info;

use courier_core::{
    CallbackData, ChatId, DispatchContext, HandlerResult, Reply, UpdateKind,
};

use crate::keyboards;

/// The pieces every callback handler needs: query id, plus the chat and
/// message the keyboard was attached to (absent for very old messages).
fn callback_parts(ctx: &DispatchContext) -> Option<(String, Option<(ChatId, i64)>)> {
    match &ctx.update().kind {
        UpdateKind::CallbackQuery(cb) => Some((
            cb.id.clone(),
            cb.message.as_ref().map(|m| (m.chat, m.message_id)),
        )),
        _ => None,
    }
}

/// `menu:main` — return to the main menu.
pub async fn cb_main_menu(ctx: Arc<DispatchContext>) -> HandlerResult {
    let Some((callback_id, message)) = callback_parts(&ctx) else {
        return Ok(());
    };

    if let Some((chat, message_id)) = message {
        ctx.responder()
            .edit_message(
                chat,
                message_id,
                Reply::text("Main menu:").keyboard(keyboards::main_menu()),
            )
            .await?;
    }
    ctx.responder().answer_callback(&callback_id, None, false).await?;
    Ok(())
}

/// `menu:profile` — show the stored profile card.
pub async fn cb_profile(ctx: Arc<DispatchContext>) -> HandlerResult {
    let Some((callback_id, message)) = callback_parts(&ctx) else {
        return Ok(());
    };
    let Some(user) = ctx.from_user() else {
        ctx.responder().answer_callback(&callback_id, None, false).await?;
        return Ok(());
    };

    let Some(record) = ctx.users().get_by_telegram_id(user.id).await? else {
        ctx.responder()
            .answer_callback(&callback_id, Some("User not found"), true)
            .await?;
        return Ok(());
    };

    let text = format!(
        "👤 <b>Profile</b>\n\n\
         Name: {}\n\
         Username: @{}\n\
         Role: {}\n\
         Member since: {}",
        record.full_name(),
        record.username.as_deref().unwrap_or("—"),
        record.role,
        record.created_at.format("%d.%m.%Y"),
    );

    if let Some((chat, message_id)) = message {
        ctx.responder()
            .edit_message(
                chat,
                message_id,
                Reply::text(text).keyboard(keyboards::back("menu:main")),
            )
            .await?;
    }
    ctx.responder().answer_callback(&callback_id, None, false).await?;
    Ok(())
}

/// `menu:help` — inline help screen.
pub async fn cb_help(ctx: Arc<DispatchContext>) -> HandlerResult {
    let Some((callback_id, message)) = callback_parts(&ctx) else {
        return Ok(());
    };

    if let Some((chat, message_id)) = message {
        ctx.responder()
            .edit_message(
                chat,
                message_id,
                Reply::text("❓ <b>Help</b>\n\nUse the menu buttons to navigate.")
                    .keyboard(keyboards::back("menu:main")),
            )
            .await?;
    }
    ctx.responder().answer_callback(&callback_id, None, false).await?;
    Ok(())
}

/// `menu:settings` — inline settings placeholder.
pub async fn cb_settings(ctx: Arc<DispatchContext>) -> HandlerResult {
    let Some((callback_id, message)) = callback_parts(&ctx) else {
        return Ok(());
    };

    if let Some((chat, message_id)) = message {
        ctx.responder()
            .edit_message(
                chat,
                message_id,
                Reply::text("⚙️ <b>Settings</b>\n\nNothing to configure yet.")
                    .keyboard(keyboards::back("menu:main")),
            )
            .await?;
    }
    ctx.responder().answer_callback(&callback_id, None, false).await?;
    Ok(())
}

/// `confirm:{yes|no}:{action}` — generic yes/no confirmation.
///
/// Malformed data is answered neutrally; it never fails the dispatch.
pub async fn cb_confirm(ctx: Arc<DispatchContext>) -> HandlerResult {
    let Some((callback_id, _message)) = callback_parts(&ctx) else {
        return Ok(());
    };

    let raw = ctx.update().text().unwrap_or_default().to_string();
    let data = match CallbackData::parse(&raw) {
        Ok(data) => data,
        Err(err) => {
            info!(error = %err, "malformed confirm payload");
            ctx.responder()
                .answer_callback(&callback_id, Some("This button no longer works"), false)
                .await?;
            return Ok(());
        }
    };

    let action = data.payload.unwrap_or("unknown");
    info!(
        choice = data.action,
        action,
        user_id = ctx.from_user().map(|u| u.id.0),
        "confirm_callback"
    );

    let answer = if data.action == "yes" {
        format!("Action '{action}' confirmed")
    } else {
        "Cancelled".to_string()
    };
    ctx.responder()
        .answer_callback(&callback_id, Some(answer.as_str()), false)
        .await?;
    Ok(())
}

/// `noop` — acknowledges decorative buttons (e.g. the page counter).
pub async fn cb_noop(ctx: Arc<DispatchContext>) -> HandlerResult {
    if let Some((callback_id, _)) = callback_parts(&ctx) {
        ctx.responder().answer_callback(&callback_id, None, false).await?;
    }
    Ok(())
}
