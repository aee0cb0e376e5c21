//! Notification repository trait

use async_trait::async_trait;

use super::entity::{Notification, NotificationId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for notification persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a new notification
    async fn create(&self, notification: Notification) -> Result<Notification, DomainError>;

    /// Get a notification by ID
    async fn get(&self, id: &NotificationId) -> Result<Option<Notification>, DomainError>;

    /// Notifications addressed to a user, most recent first
    async fn list_for_user(
        &self,
        user_id: &UserId,
        unread_only: bool,
    ) -> Result<Vec<Notification>, DomainError>;

    /// Mark one notification read, returns false if it does not exist
    async fn mark_read(&self, id: &NotificationId) -> Result<bool, DomainError>;

    /// Mark every notification of a user read, returns how many changed
    async fn mark_all_read(&self, user_id: &UserId) -> Result<usize, DomainError>;
}
