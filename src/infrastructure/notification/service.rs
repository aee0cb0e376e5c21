//! Notification side-channel

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::notification::{Notification, NotificationId, NotificationRepository};
use crate::domain::user::User;
use crate::domain::DomainError;

/// Trait for notification service operations
#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    /// Persist a notification, logging instead of failing when the write fails
    async fn notify(&self, notification: Notification) -> Option<Notification>;

    /// Notifications of the caller, most recent first
    async fn list(&self, user: &User, unread_only: bool)
        -> Result<Vec<Notification>, DomainError>;

    /// Mark one of the caller's notifications read
    async fn mark_read(&self, user: &User, id: &NotificationId)
        -> Result<Notification, DomainError>;

    /// Mark all of the caller's notifications read, returns how many changed
    async fn mark_all_read(&self, user: &User) -> Result<usize, DomainError>;
}

/// Notification service backed by a repository
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish_non_exhaustive()
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn notify(&self, notification: Notification) -> Option<Notification> {
        let recipient = *notification.user_id();
        let kind = notification.kind();

        match self.repository.create(notification).await {
            Ok(created) => {
                debug!(user_id = %recipient, kind = %kind, "Notification stored");
                Some(created)
            }
            Err(e) => {
                warn!(
                    user_id = %recipient,
                    kind = %kind,
                    error = %e,
                    "Failed to store notification"
                );
                None
            }
        }
    }

    async fn list(
        &self,
        user: &User,
        unread_only: bool,
    ) -> Result<Vec<Notification>, DomainError> {
        self.repository.list_for_user(user.id(), unread_only).await
    }

    async fn mark_read(
        &self,
        user: &User,
        id: &NotificationId,
    ) -> Result<Notification, DomainError> {
        let not_found = || DomainError::not_found(format!("Notification '{}' not found", id));

        let mut notification = self
            .repository
            .get(id)
            .await?
            .filter(|n| n.user_id() == user.id())
            .ok_or_else(not_found)?;

        if !notification.is_read() {
            if !self.repository.mark_read(id).await? {
                return Err(not_found());
            }
            notification.mark_read();
        }

        Ok(notification)
    }

    async fn mark_all_read(&self, user: &User) -> Result<usize, DomainError> {
        let changed = self.repository.mark_all_read(user.id()).await?;
        debug!(user_id = %user.id(), changed, "Marked notifications read");
        Ok(changed)
    }
}
