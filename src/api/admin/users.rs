//! User administration endpoints

use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::teams::dto::UserResponse;
use crate::api::types::{ApiError, Json};
use crate::domain::policy;
use crate::domain::user::UserRole;
use crate::infrastructure::user::CreateUserRequest;

/// Request to register a user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserApiRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub github_username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// POST /admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireUser(admin): RequireUser,
    Json(request): Json<CreateUserApiRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    policy::manage_users(&admin).into_result()?;

    debug!(email = %request.email, role = %request.role, "Admin creating user");

    let user = state
        .user_service
        .create(CreateUserRequest {
            name: request.name,
            email: request.email,
            role: request.role,
            github_username: request.github_username,
            avatar_url: request.avatar_url,
        })
        .await?;

    info!(admin_id = %admin.id(), user_id = %user.id(), "User created");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}
