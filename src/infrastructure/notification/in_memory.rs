//! In-memory notification repository

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::notification::{Notification, NotificationId, NotificationRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::InMemoryDatabase;

#[derive(Debug, Clone)]
pub struct InMemoryNotificationRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryNotificationRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

impl Default for InMemoryNotificationRepository {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryDatabase::new()))
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(&self, notification: Notification) -> Result<Notification, DomainError> {
        let mut tables = self.db.write().await;

        if tables.notifications.contains_key(notification.id()) {
            return Err(DomainError::conflict(format!(
                "Notification '{}' already exists",
                notification.id()
            )));
        }

        tables
            .notifications
            .insert(*notification.id(), notification.clone());
        Ok(notification)
    }

    async fn get(&self, id: &NotificationId) -> Result<Option<Notification>, DomainError> {
        Ok(self.db.read().await.notifications.get(id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        unread_only: bool,
    ) -> Result<Vec<Notification>, DomainError> {
        let tables = self.db.read().await;

        let mut notifications: Vec<Notification> = tables
            .notifications
            .values()
            .filter(|n| n.user_id() == user_id && (!unread_only || !n.is_read()))
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(notifications)
    }

    async fn mark_read(&self, id: &NotificationId) -> Result<bool, DomainError> {
        let mut tables = self.db.write().await;

        match tables.notifications.get_mut(id) {
            Some(notification) => {
                notification.mark_read();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let mut tables = self.db.write().await;
        let mut changed = 0;

        for notification in tables
            .notifications
            .values_mut()
            .filter(|n| n.user_id() == user_id && !n.is_read())
        {
            notification.mark_read();
            changed += 1;
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::NotificationKind;

    fn notification(user_id: UserId) -> Notification {
        Notification::new(
            user_id,
            NotificationKind::TeamInvitation,
            "Team invitation",
            "You have been invited",
        )
    }

    #[tokio::test]
    async fn test_list_filters_by_user_and_read_state() {
        let repo = InMemoryNotificationRepository::default();
        let user = UserId::generate();
        let other = UserId::generate();

        let first = repo.create(notification(user)).await.unwrap();
        repo.create(notification(user)).await.unwrap();
        repo.create(notification(other)).await.unwrap();

        assert_eq!(repo.list_for_user(&user, false).await.unwrap().len(), 2);

        assert!(repo.mark_read(first.id()).await.unwrap());
        let unread = repo.list_for_user(&user, true).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_ne!(unread[0].id(), first.id());
    }

    #[tokio::test]
    async fn test_mark_all_read_counts_changes() {
        let repo = InMemoryNotificationRepository::default();
        let user = UserId::generate();

        repo.create(notification(user)).await.unwrap();
        repo.create(notification(user)).await.unwrap();

        assert_eq!(repo.mark_all_read(&user).await.unwrap(), 2);
        assert_eq!(repo.mark_all_read(&user).await.unwrap(), 0);
        assert!(!repo.mark_read(&NotificationId::generate()).await.unwrap());
    }
}
