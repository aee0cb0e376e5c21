//! Team invitation repository trait

use async_trait::async_trait;

use super::entity::{InvitationId, TeamInvitation};
use crate::domain::notification::Notification;
use crate::domain::project::{ProjectId, ProjectMember, Term};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for team invitations.
///
/// Multi-row writes (`create` with a superseded row, `accept`, `reject`,
/// `cancel`) are single units of work: either every write lands or none do.
#[async_trait]
pub trait TeamInvitationRepository: Send + Sync + std::fmt::Debug {
    /// Get an invitation by ID
    async fn get(&self, id: &InvitationId) -> Result<Option<TeamInvitation>, DomainError>;

    /// All invitations of a project regardless of status, most recent first
    async fn list_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<TeamInvitation>, DomainError>;

    /// Pending invitations addressed to a user, most recent first
    async fn list_pending_for_invitee(
        &self,
        invitee_id: &UserId,
    ) -> Result<Vec<TeamInvitation>, DomainError>;

    /// Every invitation row for a (project, invitee) pair
    async fn find_for_pair(
        &self,
        project_id: &ProjectId,
        invitee_id: &UserId,
    ) -> Result<Vec<TeamInvitation>, DomainError>;

    /// Number of pending invitations on a project
    async fn count_pending_by_project(&self, project_id: &ProjectId)
        -> Result<usize, DomainError>;

    /// Insert a pending invitation, deleting `supersedes` (a rejected row for
    /// the same pair) in the same unit of work.
    ///
    /// Fails with `Conflict` if the pair already has a pending invitation and
    /// with `Validation` if members plus pending invitations of the project
    /// already reach `team_cap`.
    async fn create(
        &self,
        invitation: TeamInvitation,
        supersedes: Option<InvitationId>,
        team_cap: usize,
    ) -> Result<TeamInvitation, DomainError>;

    /// Persist an accepted invitation together with the new member row and
    /// the inviter's notification.
    ///
    /// Fails with `Conflict` and writes nothing if the stored row is no
    /// longer pending, or if the invitee already owns or belongs to a
    /// project in `term`.
    async fn accept(
        &self,
        invitation: &TeamInvitation,
        term: &Term,
        member: ProjectMember,
        notification: Notification,
    ) -> Result<TeamInvitation, DomainError>;

    /// Persist a rejected invitation together with the inviter's
    /// notification. Same pending guard as `accept`.
    async fn reject(
        &self,
        invitation: &TeamInvitation,
        notification: Notification,
    ) -> Result<TeamInvitation, DomainError>;

    /// Delete a pending invitation.
    ///
    /// Fails with `NotFound` if absent and `Conflict` if already answered.
    async fn cancel(&self, id: &InvitationId) -> Result<(), DomainError>;
}
