//! PostgreSQL notification repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row};
use uuid::Uuid;

use crate::domain::notification::{
    Notification, NotificationId, NotificationKind, NotificationRepository,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;

const NOTIFICATION_COLUMNS: &str = "id, user_id, kind, title, message, link, read, created_at";

#[derive(Debug, Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Insert a notification using any executor, so it can join a transaction
pub(crate) async fn insert_notification<'e, E>(
    executor: E,
    notification: &Notification,
) -> Result<(), DomainError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, kind, title, message, link, read, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(notification.id().as_uuid())
    .bind(notification.user_id().as_uuid())
    .bind(notification.kind().as_str())
    .bind(notification.title())
    .bind(notification.message())
    .bind(notification.link())
    .bind(notification.is_read())
    .bind(notification.created_at())
    .execute(executor)
    .await
    .map_err(|e| DomainError::storage(format!("Failed to create notification: {}", e)))?;

    Ok(())
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn create(&self, notification: Notification) -> Result<Notification, DomainError> {
        insert_notification(&self.pool, &notification).await?;
        Ok(notification)
    }

    async fn get(&self, id: &NotificationId) -> Result<Option<Notification>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM notifications WHERE id = $1",
            NOTIFICATION_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get notification: {}", e)))?;

        row.as_ref().map(row_to_notification).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        unread_only: bool,
    ) -> Result<Vec<Notification>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM notifications
            WHERE user_id = $1 AND ($2 = FALSE OR read = FALSE)
            ORDER BY created_at DESC
            "#,
            NOTIFICATION_COLUMNS
        ))
        .bind(user_id.as_uuid())
        .bind(unread_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list notifications: {}", e)))?;

        rows.iter().map(row_to_notification).collect()
    }

    async fn mark_read(&self, id: &NotificationId) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to mark notification read: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, user_id: &UserId) -> Result<usize, DomainError> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE")
                .bind(user_id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to mark notifications read: {}", e))
                })?;

        Ok(result.rows_affected() as usize)
    }
}

fn row_to_notification(row: &sqlx::postgres::PgRow) -> Result<Notification, DomainError> {
    let id: Uuid = row.get("id");
    let user_id: Uuid = row.get("user_id");
    let kind: String = row.get("kind");
    let created_at: DateTime<Utc> = row.get("created_at");

    let kind = NotificationKind::parse(&kind).ok_or_else(|| {
        DomainError::storage(format!("Invalid notification kind in database: {}", kind))
    })?;

    Ok(Notification::restore(
        NotificationId::from_uuid(id),
        UserId::from_uuid(user_id),
        kind,
        row.get("title"),
        row.get("message"),
        row.get("link"),
        row.get("read"),
        created_at,
    ))
}
