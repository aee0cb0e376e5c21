//! Team invitation endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dto::InvitationResponse;
use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::invitation::{InvitationAction, InvitationId};
use crate::domain::project::ProjectId;
use crate::domain::user::UserId;
use crate::infrastructure::invitation::SendInvitationRequest;

/// Request to invite a student to a project
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendInvitationApiRequest {
    pub invitee_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Invitee's answer
#[derive(Debug, Clone, Deserialize)]
pub struct RespondInvitationApiRequest {
    pub action: InvitationAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendInvitationResponse {
    pub invitation: InvitationResponse,
    /// False when the invitee's notification could not be stored
    pub notified: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListInvitationsResponse {
    pub invitations: Vec<InvitationResponse>,
    pub total: usize,
}

impl ListInvitationsResponse {
    fn new(invitations: Vec<InvitationResponse>) -> Self {
        let total = invitations.len();
        Self { invitations, total }
    }
}

/// GET /projects/{project_id}/invitations
pub async fn list_project_invitations(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(project_id): Path<String>,
) -> Result<Json<ListInvitationsResponse>, ApiError> {
    debug!(project_id = %project_id, "Listing project invitations");

    let project_id = ProjectId::parse(&project_id)?;
    let invitations = state
        .invitation_service
        .list_for_project(&user, &project_id)
        .await?;

    Ok(Json(ListInvitationsResponse::new(
        invitations.iter().map(InvitationResponse::from).collect(),
    )))
}

/// POST /projects/{project_id}/invitations
pub async fn send_invitation(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(project_id): Path<String>,
    Json(request): Json<SendInvitationApiRequest>,
) -> Result<(StatusCode, Json<SendInvitationResponse>), ApiError> {
    debug!(project_id = %project_id, invitee_id = %request.invitee_id, "Sending invitation");

    let project_id = ProjectId::parse(&project_id)?;
    let invitee_id = UserId::parse(&request.invitee_id)
        .map_err(|e| ApiError::from(e).with_param("inviteeId"))?;

    let outcome = state
        .invitation_service
        .send(
            &user,
            &project_id,
            SendInvitationRequest {
                invitee_id,
                message: request.message,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SendInvitationResponse {
            invitation: InvitationResponse::from(&outcome.invitation),
            notified: outcome.notified,
        }),
    ))
}

/// GET /invitations
pub async fn list_my_invitations(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<ListInvitationsResponse>, ApiError> {
    debug!(user_id = %user.id(), "Listing received invitations");

    let invitations = state.invitation_service.list_received(&user).await?;

    Ok(Json(ListInvitationsResponse::new(
        invitations.iter().map(InvitationResponse::from).collect(),
    )))
}

/// GET /invitations/{invitation_id}
pub async fn get_invitation(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(invitation_id): Path<String>,
) -> Result<Json<InvitationResponse>, ApiError> {
    debug!(invitation_id = %invitation_id, "Getting invitation");

    let invitation_id = InvitationId::parse(&invitation_id)?;
    let details = state.invitation_service.get(&user, &invitation_id).await?;

    Ok(Json(InvitationResponse::from(&details)))
}

/// PUT /invitations/{invitation_id}
pub async fn respond_to_invitation(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(invitation_id): Path<String>,
    Json(request): Json<RespondInvitationApiRequest>,
) -> Result<Json<InvitationResponse>, ApiError> {
    debug!(invitation_id = %invitation_id, action = ?request.action, "Responding to invitation");

    let invitation_id = InvitationId::parse(&invitation_id)?;
    let invitation = state
        .invitation_service
        .respond(&user, &invitation_id, request.action)
        .await?;

    Ok(Json(InvitationResponse::from(&invitation)))
}

/// DELETE /invitations/{invitation_id}
pub async fn cancel_invitation(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(invitation_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    debug!(invitation_id = %invitation_id, "Cancelling invitation");

    let invitation_id = InvitationId::parse(&invitation_id)?;
    state.invitation_service.cancel(&user, &invitation_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
