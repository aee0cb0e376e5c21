//! Typed permission checks
//!
//! Each check compares the caller against stored owner, inviter or invitee
//! fields and returns an [`Access`] decision instead of a bare boolean.

use crate::domain::invitation::TeamInvitation;
use crate::domain::project::Project;
use crate::domain::user::User;
use crate::domain::DomainError;

/// Outcome of a permission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Forbidden(String),
}

impl Access {
    fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }

    fn allow_if(condition: bool, reason: &str) -> Self {
        if condition {
            Self::Allowed
        } else {
            Self::forbidden(reason)
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Convert into a `Forbidden` domain error when denied
    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            Self::Allowed => Ok(()),
            Self::Forbidden(reason) => Err(DomainError::forbidden(reason)),
        }
    }
}

/// Only the owner manages a project's team and its invitations
pub fn manage_project(project: &Project, user: &User) -> Access {
    Access::allow_if(
        project.is_owned_by(user.id()),
        "Only the project owner can manage the team",
    )
}

/// Owners, team members and staff can read a project
pub fn view_project(project: &Project, is_member: bool, user: &User) -> Access {
    Access::allow_if(
        project.is_owned_by(user.id()) || is_member || user.role().is_staff(),
        "You do not have access to this project",
    )
}

/// Only students can own projects
pub fn create_project(user: &User) -> Access {
    Access::allow_if(user.is_student(), "Only students can create projects")
}

/// The inviter and the invitee can read an invitation
pub fn view_invitation(invitation: &TeamInvitation, user: &User) -> Access {
    Access::allow_if(
        invitation.inviter_id() == user.id() || invitation.invitee_id() == user.id(),
        "You do not have access to this invitation",
    )
}

/// Only the invitee answers an invitation
pub fn respond_to_invitation(invitation: &TeamInvitation, user: &User) -> Access {
    Access::allow_if(
        invitation.invitee_id() == user.id(),
        "Only the invited student can respond to this invitation",
    )
}

/// Only the inviter cancels an invitation
pub fn cancel_invitation(invitation: &TeamInvitation, user: &User) -> Access {
    Access::allow_if(
        invitation.inviter_id() == user.id(),
        "Only the project owner who sent this invitation can cancel it",
    )
}

/// Administrators manage user accounts
pub fn manage_users(user: &User) -> Access {
    Access::allow_if(
        matches!(user.role(), crate::domain::user::UserRole::Admin),
        "Administrator role required",
    )
}
