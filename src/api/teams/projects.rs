//! Project endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dto::{ProjectDetailsResponse, ProjectResponse};
use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::project::{ProjectId, Semester, Term};
use crate::domain::user::UserId;
use crate::infrastructure::project::CreateProjectRequest;

/// Request to create a project
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectApiRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub semester: Semester,
    pub academic_year: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListProjectsResponse {
    pub projects: Vec<ProjectResponse>,
    pub total: usize,
}

/// POST /projects
pub async fn create_project(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<CreateProjectApiRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    debug!(user_id = %user.id(), title = %request.title, "Creating project");

    let term = Term::new(request.semester, request.academic_year)
        .map_err(|e| ApiError::bad_request(e.to_string()).with_param("academicYear"))?;

    let project = state
        .project_service
        .create(
            &user,
            CreateProjectRequest {
                title: request.title,
                description: request.description,
                term,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ProjectResponse::from(&project))))
}

/// GET /projects
pub async fn list_my_projects(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<ListProjectsResponse>, ApiError> {
    debug!(user_id = %user.id(), "Listing own projects");

    let projects = state.project_service.list_mine(&user).await?;
    let projects: Vec<ProjectResponse> = projects.iter().map(ProjectResponse::from).collect();
    let total = projects.len();

    Ok(Json(ListProjectsResponse { projects, total }))
}

/// GET /projects/{project_id}
pub async fn get_project(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectDetailsResponse>, ApiError> {
    debug!(project_id = %project_id, "Getting project");

    let project_id = ProjectId::parse(&project_id)?;
    let details = state.project_service.get(&user, &project_id).await?;

    Ok(Json(ProjectDetailsResponse::from(&details)))
}

/// DELETE /projects/{project_id}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path((project_id, member_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    debug!(project_id = %project_id, member_id = %member_id, "Removing team member");

    let project_id = ProjectId::parse(&project_id)?;
    let member_id = UserId::parse(&member_id)?;

    state
        .project_service
        .remove_member(&user, &project_id, &member_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
