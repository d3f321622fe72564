//! Free-text fallback handler.

use std::sync::Arc;

use courier_core::{DispatchContext, HandlerResult, Reply};

use crate::keyboards;

/// Catch-all for text that matched no command: echo it back with a nudge
/// towards the menu. Registered as the router's fallback, so it only runs
/// when everything else declined the update.
pub async fn echo(ctx: Arc<DispatchContext>) -> HandlerResult {
    let Some(chat) = ctx.update().chat_id() else {
        return Ok(());
    };
    let text = ctx.update().text().unwrap_or_default();

    ctx.responder()
        .send_message(
            chat,
            Reply::text(format!(
                "You wrote: <i>{text}</i>\n\n\
                 I don't know how to respond to that. Use the menu or /help."
            ))
            .keyboard(keyboards::main_menu()),
        )
        .await?;
    Ok(())
}
