//! In-memory user store.
//!
//! Implements the pipeline's [`UserRepository`] trait over a mutex-guarded
//! map. Good for development and tests; deployments that need durability
//! swap in a database-backed implementation of the same trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use courier_core::{RepositoryError, Sender, UserId, UserRecord, UserRepository, UserRole};

/// Non-durable [`UserRepository`] implementation.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserStore {
    async fn get_by_telegram_id(
        &self,
        id: UserId,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn upsert(&self, sender: &Sender) -> Result<(UserRecord, bool), RepositoryError> {
        let now = Utc::now();
        let mut users = self.users.write();

        if let Some(record) = users.get_mut(&sender.id) {
            record.username.clone_from(&sender.username);
            record.first_name.clone_from(&sender.first_name);
            record.last_name.clone_from(&sender.last_name);
            record.language_code.clone_from(&sender.language_code);
            record.updated_at = now;
            return Ok((record.clone(), false));
        }

        let record = UserRecord {
            telegram_id: sender.id,
            username: sender.username.clone(),
            first_name: sender.first_name.clone(),
            last_name: sender.last_name.clone(),
            language_code: sender.language_code.clone(),
            is_bot: sender.is_bot,
            is_active: true,
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        };
        users.insert(sender.id, record.clone());
        Ok((record, true))
    }

    async fn set_role(&self, id: UserId, role: UserRole) -> Result<(), RepositoryError> {
        let mut users = self.users.write();
        let record = users.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;
        record.role = role;
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn deactivate(&self, id: UserId) -> Result<(), RepositoryError> {
        let mut users = self.users.write();
        let record = users.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;
        record.is_active = false;
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn count_active(&self) -> Result<u64, RepositoryError> {
        Ok(self.users.read().values().filter(|u| u.is_active).count() as u64)
    }
}
