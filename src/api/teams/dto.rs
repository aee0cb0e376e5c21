//! Response bodies shared by the team endpoints

use chrono::Utc;
use serde::Serialize;

use crate::domain::invitation::TeamInvitation;
use crate::domain::notification::Notification;
use crate::domain::project::{Project, ProjectMember};
use crate::domain::user::User;
use crate::infrastructure::invitation::InvitationDetails;
use crate::infrastructure::project::ProjectDetails;

/// Full user profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub github_username: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            role: user.role().as_str().to_string(),
            status: user.status().as_str().to_string(),
            github_username: user.github_username().map(String::from),
            avatar_url: user.avatar_url().map(String::from),
            created_at: user.created_at().to_rfc3339(),
        }
    }
}

/// Display identity of a user attached to another resource
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub github_username: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            github_username: user.github_username().map(String::from),
            avatar_url: user.avatar_url().map(String::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub semester: String,
    pub academic_year: String,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id().to_string(),
            title: project.title().to_string(),
            description: project.description().map(String::from),
            status: project.status().as_str().to_string(),
            semester: project.term().semester().as_str().to_string(),
            academic_year: project.term().academic_year().to_string(),
            owner_id: project.owner_id().to_string(),
            created_at: project.created_at().to_rfc3339(),
            updated_at: project.updated_at().to_rfc3339(),
        }
    }
}

/// Project summary attached to invitations
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub title: String,
    pub semester: String,
    pub academic_year: String,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id().to_string(),
            title: project.title().to_string(),
            semester: project.term().semester().as_str().to_string(),
            academic_year: project.term().academic_year().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub user_id: String,
    pub name: String,
    pub github_username: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub joined_at: String,
}

impl From<&ProjectMember> for MemberResponse {
    fn from(member: &ProjectMember) -> Self {
        Self {
            user_id: member.user_id().to_string(),
            name: member.name().to_string(),
            github_username: member.github_username().map(String::from),
            avatar_url: member.avatar_url().map(String::from),
            role: member.role().as_str().to_string(),
            joined_at: member.joined_at().to_rfc3339(),
        }
    }
}

/// A project with its owner and team
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailsResponse {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub owner: Option<UserSummary>,
    pub members: Vec<MemberResponse>,
}

impl From<&ProjectDetails> for ProjectDetailsResponse {
    fn from(details: &ProjectDetails) -> Self {
        Self {
            project: ProjectResponse::from(&details.project),
            owner: details.owner.as_ref().map(UserSummary::from),
            members: details.members.iter().map(MemberResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub id: String,
    pub project_id: String,
    pub inviter_id: String,
    pub invitee_id: String,
    pub status: String,
    pub message: Option<String>,
    pub expires_at: String,
    pub is_past_expiry: bool,
    pub created_at: String,
    pub responded_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inviter: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitee: Option<UserSummary>,
}

impl From<&TeamInvitation> for InvitationResponse {
    fn from(invitation: &TeamInvitation) -> Self {
        Self {
            id: invitation.id().to_string(),
            project_id: invitation.project_id().to_string(),
            inviter_id: invitation.inviter_id().to_string(),
            invitee_id: invitation.invitee_id().to_string(),
            status: invitation.status().as_str().to_string(),
            message: invitation.message().map(String::from),
            expires_at: invitation.expires_at().to_rfc3339(),
            is_past_expiry: invitation.is_past_expiry(Utc::now()),
            created_at: invitation.created_at().to_rfc3339(),
            responded_at: invitation.responded_at().map(|t| t.to_rfc3339()),
            project: None,
            inviter: None,
            invitee: None,
        }
    }
}

impl From<&InvitationDetails> for InvitationResponse {
    fn from(details: &InvitationDetails) -> Self {
        Self {
            project: details.project.as_ref().map(ProjectSummary::from),
            inviter: details.inviter.as_ref().map(UserSummary::from),
            invitee: details.invitee.as_ref().map(UserSummary::from),
            ..Self::from(&details.invitation)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

impl From<&Notification> for NotificationResponse {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id().to_string(),
            kind: notification.kind().as_str().to_string(),
            title: notification.title().to_string(),
            message: notification.message().to_string(),
            link: notification.link().map(String::from),
            is_read: notification.is_read(),
            created_at: notification.created_at().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::project::ProjectId;
    use crate::domain::user::UserId;

    fn invitation(ttl: Duration) -> TeamInvitation {
        TeamInvitation::new(
            ProjectId::generate(),
            UserId::generate(),
            UserId::generate(),
            None,
            ttl,
        )
        .unwrap()
    }

    #[test]
    fn test_invitation_response_reports_expiry() {
        let fresh = InvitationResponse::from(&invitation(Duration::days(7)));
        assert!(!fresh.is_past_expiry);
        assert_eq!(fresh.status, "pending");

        let stale = InvitationResponse::from(&invitation(Duration::days(-1)));
        assert!(stale.is_past_expiry);
        // Expiry is informational, the invitation stays pending
        assert_eq!(stale.status, "pending");

        let body = serde_json::to_value(&stale).unwrap();
        assert_eq!(body["isPastExpiry"], true);
        assert!(body.get("project").is_none());
    }
}
