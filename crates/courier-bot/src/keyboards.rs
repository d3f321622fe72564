//! Inline keyboard factories.
//!
//! Every keyboard the bot shows is produced here, so the callback data
//! strings the handlers route on live in one place.
//!
//! ```rust,ignore
//! ctx.responder()
//!     .send_message(chat, Reply::text("Pick an action:").keyboard(main_menu()))
//!     .await?;
//! ```

use courier_core::{Button, Keyboard};

/// The main menu: Profile / Help on one row, Settings below.
pub fn main_menu() -> Keyboard {
    Keyboard::new()
        .row(vec![
            Button::callback("👤 Profile", "menu:profile"),
            Button::callback("❓ Help", "menu:help"),
        ])
        .row(vec![Button::callback("⚙️ Settings", "menu:settings")])
}

/// A Yes / No confirmation keyboard.
///
/// Buttons emit `"confirm:yes:{action}"` / `"confirm:no:{action}"`.
pub fn confirm(action: &str) -> Keyboard {
    Keyboard::new().row(vec![
        Button::callback("✅ Yes", format!("confirm:yes:{action}")),
        Button::callback("❌ No", format!("confirm:no:{action}")),
    ])
}

/// A single «Back» button emitting `target` (usually `"menu:main"`).
pub fn back(target: &str) -> Keyboard {
    Keyboard::new().row(vec![Button::callback("⬅️ Back", target)])
}

/// Pagination controls: `◀️ | current/total | ▶️`.
///
/// Arrows emit `"{prefix}:page:{n}"`; the counter button is a `noop`.
pub fn paginate(page: usize, total_pages: usize, prefix: &str) -> Keyboard {
    let mut buttons = Vec::new();

    if page > 0 {
        buttons.push(Button::callback("◀️", format!("{prefix}:page:{}", page - 1)));
    }
    buttons.push(Button::callback(
        format!("{}/{}", page + 1, total_pages),
        "noop",
    ));
    if page + 1 < total_pages {
        buttons.push(Button::callback("▶️", format!("{prefix}:page:{}", page + 1)));
    }

    Keyboard::new().row(buttons)
}
