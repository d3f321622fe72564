//! User-persistence collaborator interface.
//!
//! The pipeline does not own a database. Terminal handlers talk to whatever
//! store the application wires in through the [`UserRepository`] trait; the
//! reference binary ships an in-memory implementation, production
//! deployments swap in a real one. Each handler call is its own
//! transactional scope; the pipeline never holds a transaction across the
//! middleware chain.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::RepositoryError;
use crate::update::{Sender, UserId};

/// Access level of a persisted user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserRole {
    /// Regular user.
    #[default]
    User,
    /// Moderation privileges.
    Moderator,
    /// Full administrative privileges.
    Admin,
}

impl UserRole {
    /// Stable lowercase name, used in profile screens and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Moderator => "moderator",
            UserRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted Telegram user.
///
/// Created on first `/start`; display fields are synced from the latest
/// update on every subsequent upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique Telegram user id (the external key).
    pub telegram_id: UserId,
    /// Optional @username, without the `@`.
    pub username: Option<String>,
    /// First name from the Telegram profile.
    pub first_name: String,
    /// Last name from the Telegram profile.
    pub last_name: Option<String>,
    /// IETF language tag.
    pub language_code: Option<String>,
    /// Whether the account is a bot.
    pub is_bot: bool,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Access level.
    pub role: UserRole,
    /// First interaction timestamp.
    pub created_at: DateTime<Utc>,
    /// Last profile-sync timestamp.
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Human-readable display name.
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

/// Async persistence operations for [`UserRecord`]s.
///
/// Failures surface as [`RepositoryError`]s and propagate; the pipeline
/// never swallows them.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetches a user by Telegram id, `None` if unknown.
    async fn get_by_telegram_id(&self, id: UserId) -> Result<Option<UserRecord>, RepositoryError>;

    /// Inserts the sender as a new user, or syncs the mutable display
    /// fields of an existing one. Returns the record and whether it was
    /// created by this call.
    async fn upsert(&self, sender: &Sender) -> Result<(UserRecord, bool), RepositoryError>;

    /// Changes a user's role.
    async fn set_role(&self, id: UserId, role: UserRole) -> Result<(), RepositoryError>;

    /// Soft-deletes a user.
    async fn deactivate(&self, id: UserId) -> Result<(), RepositoryError>;

    /// Number of active users.
    async fn count_active(&self) -> Result<u64, RepositoryError>;
}
