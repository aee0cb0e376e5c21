//! Notification inbox endpoints

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dto::NotificationResponse;
use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::notification::NotificationId;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsResponse {
    pub notifications: Vec<NotificationResponse>,
    pub total: usize,
    pub unread: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}

/// GET /notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<ListNotificationsResponse>, ApiError> {
    debug!(user_id = %user.id(), unread_only = query.unread_only, "Listing notifications");

    let notifications = state
        .notification_service
        .list(&user, query.unread_only)
        .await?;

    let unread = notifications.iter().filter(|n| !n.is_read()).count();
    let notifications: Vec<NotificationResponse> =
        notifications.iter().map(NotificationResponse::from).collect();
    let total = notifications.len();

    Ok(Json(ListNotificationsResponse {
        notifications,
        total,
        unread,
    }))
}

/// PUT /notifications/{notification_id}/read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(notification_id): Path<String>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let notification_id = NotificationId::parse(&notification_id)?;
    let notification = state
        .notification_service
        .mark_read(&user, &notification_id)
        .await?;

    Ok(Json(NotificationResponse::from(&notification)))
}

/// PUT /notifications/read-all
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let updated = state.notification_service.mark_all_read(&user).await?;

    Ok(Json(MarkAllReadResponse { updated }))
}
