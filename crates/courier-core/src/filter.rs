//! Filter predicates for routing updates.
//!
//! A [`Filter`] is a pure check over an [`Update`]: no side effects, no I/O.
//! The [`Router`](crate::router::Router) evaluates route filters in
//! registration order and hands the update to the first match.
//!
//! Filters compose with [`FilterExt::and`] and [`FilterExt::or`], and any
//! `Fn(&Update) -> bool` closure is a filter too:
//!
//! ```rust,ignore
//! use courier_core::filter::{command, callback_prefix, FilterExt};
//!
//! router.on_message(command("start"), handler_fn(cmd_start));
//! router.on_callback(callback_prefix("confirm:"), handler_fn(cb_confirm));
//! router.on_message(|u: &Update| u.text().is_some_and(|t| t.len() > 100), handler_fn(long_text));
//! ```

use crate::update::{Update, UpdateKind};

/// A pure predicate over an inbound update.
pub trait Filter: Send + Sync {
    /// Returns `true` if the update should be handled by this filter's route.
    fn matches(&self, update: &Update) -> bool;
}

/// Any boolean closure over an update is a filter.
impl<F> Filter for F
where
    F: Fn(&Update) -> bool + Send + Sync,
{
    fn matches(&self, update: &Update) -> bool {
        self(update)
    }
}

// ============================================================================
// Combinators
// ============================================================================

/// Conjunction of two filters. Built via [`FilterExt::and`].
pub struct And<A, B> {
    left: A,
    right: B,
}

impl<A: Filter, B: Filter> Filter for And<A, B> {
    fn matches(&self, update: &Update) -> bool {
        self.left.matches(update) && self.right.matches(update)
    }
}

/// Disjunction of two filters. Built via [`FilterExt::or`].
pub struct Or<A, B> {
    left: A,
    right: B,
}

impl<A: Filter, B: Filter> Filter for Or<A, B> {
    fn matches(&self, update: &Update) -> bool {
        self.left.matches(update) || self.right.matches(update)
    }
}

/// Combinator methods available on every filter.
pub trait FilterExt: Filter + Sized {
    /// Matches when both `self` and `other` match.
    fn and<O: Filter>(self, other: O) -> And<Self, O> {
        And {
            left: self,
            right: other,
        }
    }

    /// Matches when either `self` or `other` matches.
    fn or<O: Filter>(self, other: O) -> Or<Self, O> {
        Or {
            left: self,
            right: other,
        }
    }
}

impl<F: Filter> FilterExt for F {}

// ============================================================================
// Command filter
// ============================================================================

/// Matches a bot command by name.
///
/// The command is the first whitespace-delimited token of a message's text.
/// It must start with the configured marker (default `/`), and an
/// `@botname` suffix on the token is ignored, so `/start`, `/start@my_bot`
/// and `/start now` all match `command("start")`. Matching is
/// case-sensitive and applies to new messages only.
pub struct CommandFilter {
    name: String,
    marker: char,
}

impl CommandFilter {
    /// Overrides the command marker (default `/`).
    pub fn marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }
}

impl Filter for CommandFilter {
    fn matches(&self, update: &Update) -> bool {
        let UpdateKind::Message(msg) = &update.kind else {
            return false;
        };
        let Some(token) = msg.text.as_deref().and_then(|t| t.split_whitespace().next()) else {
            return false;
        };
        let Some(stripped) = token.strip_prefix(self.marker) else {
            return false;
        };
        // "/start@my_bot" carries the addressee; only the name part counts.
        let name = stripped.split('@').next().unwrap_or(stripped);
        name == self.name
    }
}

/// Creates a filter matching the bot command `name` (without the marker).
pub fn command(name: impl Into<String>) -> CommandFilter {
    CommandFilter {
        name: name.into(),
        marker: '/',
    }
}

// ============================================================================
// Callback data filters
// ============================================================================

/// Matches a callback query whose data equals a fixed string.
pub struct CallbackExact {
    data: String,
}

impl Filter for CallbackExact {
    fn matches(&self, update: &Update) -> bool {
        match &update.kind {
            UpdateKind::CallbackQuery(cb) => cb.data.as_deref() == Some(self.data.as_str()),
            _ => false,
        }
    }
}

/// Creates a filter matching callback data exactly.
pub fn callback(data: impl Into<String>) -> CallbackExact {
    CallbackExact { data: data.into() }
}

/// Matches a callback query whose data starts with a fixed prefix.
pub struct CallbackPrefix {
    prefix: String,
}

impl Filter for CallbackPrefix {
    fn matches(&self, update: &Update) -> bool {
        match &update.kind {
            UpdateKind::CallbackQuery(cb) => cb
                .data
                .as_deref()
                .is_some_and(|d| d.starts_with(self.prefix.as_str())),
            _ => false,
        }
    }
}

/// Creates a filter matching callback data by prefix.
pub fn callback_prefix(prefix: impl Into<String>) -> CallbackPrefix {
    CallbackPrefix {
        prefix: prefix.into(),
    }
}

// ============================================================================
// Text filter
// ============================================================================

/// Matches any new message that carries text.
pub struct AnyText;

impl Filter for AnyText {
    fn matches(&self, update: &Update) -> bool {
        matches!(&update.kind, UpdateKind::Message(msg) if msg.text.is_some())
    }
}

/// Creates a filter matching any text message.
pub fn any_text() -> AnyText {
    AnyText
}
