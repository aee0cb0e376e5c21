//! In-memory team invitation repository

use std::sync::Arc;

use async_trait::async_trait;

use super::errors;
use crate::domain::invitation::{
    InvitationId, InvitationStatus, TeamInvitation, TeamInvitationRepository,
};
use crate::domain::notification::Notification;
use crate::domain::project::{ProjectId, ProjectMember, Term};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::{InMemoryDatabase, Tables};

/// In-memory implementation of TeamInvitationRepository
///
/// Each multi-row write holds the database write guard for its whole
/// duration, so checks and writes cannot interleave with other requests.
#[derive(Debug, Clone)]
pub struct InMemoryTeamInvitationRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryTeamInvitationRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

fn most_recent_first(mut invitations: Vec<TeamInvitation>) -> Vec<TeamInvitation> {
    invitations.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    invitations
}

fn pending_count(tables: &Tables, project_id: &ProjectId) -> usize {
    tables
        .invitations
        .values()
        .filter(|i| i.project_id() == project_id && i.is_pending())
        .count()
}

/// Stored copy of an invitation that must still be pending
fn stored_pending<'a>(
    tables: &'a Tables,
    id: &InvitationId,
) -> Result<&'a TeamInvitation, DomainError> {
    let stored = tables
        .invitations
        .get(id)
        .ok_or_else(|| errors::not_found(id))?;

    if !stored.is_pending() {
        return Err(errors::already_responded(stored.status()));
    }

    Ok(stored)
}

#[async_trait]
impl TeamInvitationRepository for InMemoryTeamInvitationRepository {
    async fn get(&self, id: &InvitationId) -> Result<Option<TeamInvitation>, DomainError> {
        Ok(self.db.read().await.invitations.get(id).cloned())
    }

    async fn list_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<TeamInvitation>, DomainError> {
        let tables = self.db.read().await;

        Ok(most_recent_first(
            tables
                .invitations
                .values()
                .filter(|i| i.project_id() == project_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_pending_for_invitee(
        &self,
        invitee_id: &UserId,
    ) -> Result<Vec<TeamInvitation>, DomainError> {
        let tables = self.db.read().await;

        Ok(most_recent_first(
            tables
                .invitations
                .values()
                .filter(|i| i.invitee_id() == invitee_id && i.is_pending())
                .cloned()
                .collect(),
        ))
    }

    async fn find_for_pair(
        &self,
        project_id: &ProjectId,
        invitee_id: &UserId,
    ) -> Result<Vec<TeamInvitation>, DomainError> {
        let tables = self.db.read().await;

        Ok(most_recent_first(
            tables
                .invitations
                .values()
                .filter(|i| i.project_id() == project_id && i.invitee_id() == invitee_id)
                .cloned()
                .collect(),
        ))
    }

    async fn count_pending_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<usize, DomainError> {
        Ok(pending_count(&*self.db.read().await, project_id))
    }

    async fn create(
        &self,
        invitation: TeamInvitation,
        supersedes: Option<InvitationId>,
        team_cap: usize,
    ) -> Result<TeamInvitation, DomainError> {
        let mut tables = self.db.write().await;
        let project_id = *invitation.project_id();
        let invitee_id = *invitation.invitee_id();

        if tables
            .invitations
            .values()
            .any(|i| {
                i.project_id() == &project_id && i.invitee_id() == &invitee_id && i.is_pending()
            })
        {
            return Err(errors::pending_exists());
        }

        let taken =
            tables.project_members(&project_id).count() + pending_count(&tables, &project_id);
        if taken >= team_cap {
            return Err(errors::team_full(team_cap));
        }

        if let Some(old_id) = supersedes {
            let replaceable = tables.invitations.get(&old_id).is_some_and(|old| {
                old.project_id() == &project_id
                    && old.invitee_id() == &invitee_id
                    && old.status() == InvitationStatus::Rejected
            });

            if !replaceable {
                return Err(DomainError::conflict(
                    "The previous invitation for this student changed, please retry",
                ));
            }

            tables.invitations.remove(&old_id);
        }

        tables
            .invitations
            .insert(*invitation.id(), invitation.clone());
        Ok(invitation)
    }

    async fn accept(
        &self,
        invitation: &TeamInvitation,
        term: &Term,
        member: ProjectMember,
        notification: Notification,
    ) -> Result<TeamInvitation, DomainError> {
        let mut tables = self.db.write().await;

        stored_pending(&tables, invitation.id())?;

        if tables.holds_team_in_term(member.user_id(), term) {
            return Err(errors::team_taken_in_term(term));
        }

        if tables.is_member(member.project_id(), member.user_id()) {
            return Err(DomainError::conflict(
                "User is already a member of this project",
            ));
        }

        tables
            .invitations
            .insert(*invitation.id(), invitation.clone());
        tables.members.insert(*member.id(), member);
        tables
            .notifications
            .insert(*notification.id(), notification);

        Ok(invitation.clone())
    }

    async fn reject(
        &self,
        invitation: &TeamInvitation,
        notification: Notification,
    ) -> Result<TeamInvitation, DomainError> {
        let mut tables = self.db.write().await;

        stored_pending(&tables, invitation.id())?;

        tables
            .invitations
            .insert(*invitation.id(), invitation.clone());
        tables
            .notifications
            .insert(*notification.id(), notification);

        Ok(invitation.clone())
    }

    async fn cancel(&self, id: &InvitationId) -> Result<(), DomainError> {
        let mut tables = self.db.write().await;

        stored_pending(&tables, id)?;
        tables.invitations.remove(id);

        Ok(())
    }
}
