//! Project, invitation, notification and user endpoints

pub mod dto;
pub mod invitations;
pub mod notifications;
pub mod projects;
pub mod users;

use axum::{
    routing::{delete, get, put},
    Router,
};

use super::state::AppState;

/// Create the router for the team-management API
pub fn create_teams_router() -> Router<AppState> {
    Router::new()
        // Projects
        .route(
            "/projects",
            get(projects::list_my_projects).post(projects::create_project),
        )
        .route("/projects/{project_id}", get(projects::get_project))
        .route(
            "/projects/{project_id}/members/{user_id}",
            delete(projects::remove_member),
        )
        // Invitations
        .route(
            "/projects/{project_id}/invitations",
            get(invitations::list_project_invitations).post(invitations::send_invitation),
        )
        .route("/invitations", get(invitations::list_my_invitations))
        .route(
            "/invitations/{invitation_id}",
            get(invitations::get_invitation)
                .put(invitations::respond_to_invitation)
                .delete(invitations::cancel_invitation),
        )
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/read-all",
            put(notifications::mark_all_notifications_read),
        )
        .route(
            "/notifications/{notification_id}/read",
            put(notifications::mark_notification_read),
        )
        // Users
        .route("/users/me", get(users::get_me))
}
