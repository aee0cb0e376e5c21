//! Team invitation manager
//!
//! Mediates the offer / accept / reject / cancel protocol for joining a
//! project team. Precondition checks run here; the repository applies each
//! state change as one unit of work and re-checks that the invitation is
//! still pending.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, info, warn};

use super::errors;
use crate::domain::invitation::{
    InvitationAction, InvitationId, InvitationStatus, TeamInvitation, TeamInvitationRepository,
};
use crate::domain::notification::{Notification, NotificationKind};
use crate::domain::policy;
use crate::domain::project::{
    Project, ProjectId, ProjectMember, ProjectMemberRepository, ProjectRepository,
};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::notification::NotificationServiceTrait;
use crate::infrastructure::project::ensure_free_in_term;

/// Maximum number of team members besides the owner
pub const DEFAULT_MAX_TEAM_MEMBERS: usize = 3;

/// Days until a new invitation's `expires_at`
pub const DEFAULT_INVITATION_TTL_DAYS: i64 = 7;

/// Team size and invitation lifetime settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamPolicyConfig {
    /// Cap on members plus pending invitations per project
    pub max_members: usize,
    pub invitation_ttl_days: i64,
}

impl Default for TeamPolicyConfig {
    fn default() -> Self {
        Self {
            max_members: DEFAULT_MAX_TEAM_MEMBERS,
            invitation_ttl_days: DEFAULT_INVITATION_TTL_DAYS,
        }
    }
}

/// Request for sending an invitation
#[derive(Debug, Clone)]
pub struct SendInvitationRequest {
    pub invitee_id: UserId,
    pub message: Option<String>,
}

/// An invitation with the project and both parties attached
#[derive(Debug, Clone)]
pub struct InvitationDetails {
    pub invitation: TeamInvitation,
    pub project: Option<Project>,
    pub inviter: Option<User>,
    pub invitee: Option<User>,
}

/// Result of sending an invitation
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub invitation: TeamInvitation,
    /// False when the invitee's notification could not be stored
    pub notified: bool,
}

/// Trait for invitation manager operations
#[async_trait]
pub trait InvitationServiceTrait: Send + Sync {
    /// All invitations of a project the caller owns, most recent first
    async fn list_for_project(
        &self,
        user: &User,
        project_id: &ProjectId,
    ) -> Result<Vec<InvitationDetails>, DomainError>;

    /// Pending invitations addressed to the caller
    async fn list_received(&self, user: &User) -> Result<Vec<InvitationDetails>, DomainError>;

    /// One invitation visible to its inviter or invitee
    async fn get(&self, user: &User, id: &InvitationId) -> Result<InvitationDetails, DomainError>;

    /// Invite a student to a project the caller owns
    async fn send(
        &self,
        user: &User,
        project_id: &ProjectId,
        request: SendInvitationRequest,
    ) -> Result<SendOutcome, DomainError>;

    /// Accept or reject an invitation addressed to the caller
    async fn respond(
        &self,
        user: &User,
        id: &InvitationId,
        action: InvitationAction,
    ) -> Result<TeamInvitation, DomainError>;

    /// Withdraw a pending invitation the caller sent
    async fn cancel(&self, user: &User, id: &InvitationId) -> Result<(), DomainError>;
}

/// Invitation manager backed by repositories
pub struct InvitationService {
    invitations: Arc<dyn TeamInvitationRepository>,
    projects: Arc<dyn ProjectRepository>,
    members: Arc<dyn ProjectMemberRepository>,
    users: Arc<dyn UserRepository>,
    notifications: Arc<dyn NotificationServiceTrait>,
    config: TeamPolicyConfig,
}

impl InvitationService {
    pub fn new(
        invitations: Arc<dyn TeamInvitationRepository>,
        projects: Arc<dyn ProjectRepository>,
        members: Arc<dyn ProjectMemberRepository>,
        users: Arc<dyn UserRepository>,
        notifications: Arc<dyn NotificationServiceTrait>,
    ) -> Self {
        Self {
            invitations,
            projects,
            members,
            users,
            notifications,
            config: TeamPolicyConfig::default(),
        }
    }

    /// Override team size and TTL settings (builder pattern)
    pub fn with_config(mut self, config: TeamPolicyConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &TeamPolicyConfig {
        &self.config
    }

    async fn require_project(&self, id: &ProjectId) -> Result<Project, DomainError> {
        self.projects
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Project '{}' not found", id)))
    }

    async fn require_invitation(&self, id: &InvitationId) -> Result<TeamInvitation, DomainError> {
        self.invitations
            .get(id)
            .await?
            .ok_or_else(|| errors::not_found(id))
    }

    /// Attach projects and users to invitations with batched lookups
    async fn with_details(
        &self,
        invitations: Vec<TeamInvitation>,
    ) -> Result<Vec<InvitationDetails>, DomainError> {
        let mut project_ids: Vec<ProjectId> =
            invitations.iter().map(|i| *i.project_id()).collect();
        project_ids.sort();
        project_ids.dedup();

        let mut user_ids: Vec<UserId> = invitations
            .iter()
            .flat_map(|i| [*i.inviter_id(), *i.invitee_id()])
            .collect();
        user_ids.sort();
        user_ids.dedup();

        let projects: HashMap<ProjectId, Project> = self
            .projects
            .get_many(&project_ids)
            .await?
            .into_iter()
            .map(|p| (*p.id(), p))
            .collect();
        let users: HashMap<UserId, User> = self
            .users
            .get_many(&user_ids)
            .await?
            .into_iter()
            .map(|u| (*u.id(), u))
            .collect();

        Ok(invitations
            .into_iter()
            .map(|invitation| InvitationDetails {
                project: projects.get(invitation.project_id()).cloned(),
                inviter: users.get(invitation.inviter_id()).cloned(),
                invitee: users.get(invitation.invitee_id()).cloned(),
                invitation,
            })
            .collect())
    }

    /// Send-time preconditions; returns the rejected row to supersede, if any
    async fn check_send(
        &self,
        project: &Project,
        invitee: &User,
    ) -> Result<Option<InvitationId>, DomainError> {
        if project.is_owned_by(invitee.id()) {
            return Err(DomainError::validation(
                "You cannot invite yourself to your own project",
            ));
        }

        if !invitee.is_student() {
            return Err(DomainError::validation(
                "Only students can be invited to a team",
            ));
        }

        if self.members.is_member(project.id(), invitee.id()).await? {
            return Err(DomainError::validation(format!(
                "{} is already a member of this team",
                invitee.name()
            )));
        }

        let history = self
            .invitations
            .find_for_pair(project.id(), invitee.id())
            .await?;

        if history.iter().any(TeamInvitation::is_pending) {
            return Err(errors::pending_exists());
        }

        let taken = self.members.count_by_project(project.id()).await?
            + self.invitations.count_pending_by_project(project.id()).await?;
        if taken >= self.config.max_members {
            return Err(errors::team_full(self.config.max_members));
        }

        Ok(history
            .iter()
            .find(|i| i.status() == InvitationStatus::Rejected)
            .map(|i| *i.id()))
    }
}

impl std::fmt::Debug for InvitationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvitationService")
            .field("invitations", &self.invitations)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl InvitationServiceTrait for InvitationService {
    async fn list_for_project(
        &self,
        user: &User,
        project_id: &ProjectId,
    ) -> Result<Vec<InvitationDetails>, DomainError> {
        let project = self.require_project(project_id).await?;
        policy::manage_project(&project, user).into_result()?;

        let invitations = self.invitations.list_by_project(project_id).await?;
        debug!(project_id = %project_id, count = invitations.len(), "Listed project invitations");

        self.with_details(invitations).await
    }

    async fn list_received(&self, user: &User) -> Result<Vec<InvitationDetails>, DomainError> {
        let invitations = self.invitations.list_pending_for_invitee(user.id()).await?;
        self.with_details(invitations).await
    }

    async fn get(&self, user: &User, id: &InvitationId) -> Result<InvitationDetails, DomainError> {
        let invitation = self.require_invitation(id).await?;
        policy::view_invitation(&invitation, user).into_result()?;

        let mut details = self.with_details(vec![invitation]).await?;
        details.pop().ok_or_else(|| errors::not_found(id))
    }

    async fn send(
        &self,
        user: &User,
        project_id: &ProjectId,
        request: SendInvitationRequest,
    ) -> Result<SendOutcome, DomainError> {
        info!(
            project_id = %project_id,
            inviter_id = %user.id(),
            invitee_id = %request.invitee_id,
            "Sending team invitation"
        );

        let project = self.require_project(project_id).await?;
        policy::manage_project(&project, user).into_result()?;

        let invitee = self
            .users
            .get(&request.invitee_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("User '{}' not found", request.invitee_id))
            })?;

        let supersedes = self.check_send(&project, &invitee).await?;

        let invitation = TeamInvitation::new(
            *project.id(),
            *user.id(),
            *invitee.id(),
            request.message,
            Duration::days(self.config.invitation_ttl_days),
        )?;

        let invitation = self
            .invitations
            .create(invitation, supersedes, self.config.max_members)
            .await?;

        if let Some(old_id) = supersedes {
            debug!(invitation_id = %old_id, "Replaced rejected invitation");
        }

        let notified = self
            .notifications
            .notify(
                Notification::new(
                    *invitee.id(),
                    NotificationKind::TeamInvitation,
                    "Team invitation",
                    format!(
                        "{} invited you to join the team of \"{}\"",
                        user.name(),
                        project.title()
                    ),
                )
                .with_link(format!("/invitations/{}", invitation.id())),
            )
            .await
            .is_some();

        if !notified {
            warn!(invitation_id = %invitation.id(), "Invitation sent without notification");
        }

        Ok(SendOutcome {
            invitation,
            notified,
        })
    }

    async fn respond(
        &self,
        user: &User,
        id: &InvitationId,
        action: InvitationAction,
    ) -> Result<TeamInvitation, DomainError> {
        let invitation = self.require_invitation(id).await?;
        policy::respond_to_invitation(&invitation, user).into_result()?;
        invitation.ensure_pending()?;

        let project = self.require_project(invitation.project_id()).await?;

        let mut answered = invitation.clone();
        answered.respond(action)?;

        let updated = match action {
            InvitationAction::Accept => {
                ensure_free_in_term(self.projects.as_ref(), user.id(), project.term()).await?;

                let notification = Notification::new(
                    *invitation.inviter_id(),
                    NotificationKind::InvitationAccepted,
                    "Invitation accepted",
                    format!(
                        "{} accepted your invitation to join \"{}\"",
                        user.name(),
                        project.title()
                    ),
                )
                .with_link(format!("/projects/{}", project.id()));

                self.invitations
                    .accept(
                        &answered,
                        project.term(),
                        ProjectMember::join(*project.id(), user),
                        notification,
                    )
                    .await?
            }
            InvitationAction::Reject => {
                let notification = Notification::new(
                    *invitation.inviter_id(),
                    NotificationKind::InvitationRejected,
                    "Invitation declined",
                    format!(
                        "{} declined your invitation to join \"{}\"",
                        user.name(),
                        project.title()
                    ),
                )
                .with_link(format!("/projects/{}", project.id()));

                self.invitations.reject(&answered, notification).await?
            }
        };

        info!(
            invitation_id = %id,
            project_id = %project.id(),
            status = %updated.status(),
            "Invitation answered"
        );

        Ok(updated)
    }

    async fn cancel(&self, user: &User, id: &InvitationId) -> Result<(), DomainError> {
        let invitation = self.require_invitation(id).await?;
        policy::cancel_invitation(&invitation, user).into_result()?;
        invitation.ensure_pending()?;

        self.invitations.cancel(id).await?;
        info!(invitation_id = %id, "Invitation cancelled");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::MockNotificationRepository;
    use crate::domain::project::{Semester, Term};
    use crate::domain::user::UserRole;
    use crate::infrastructure::notification::NotificationService;
    use crate::infrastructure::storage::{Repositories, StorageFactory};

    struct Fixture {
        repos: Repositories,
        notifications: Arc<NotificationService>,
        service: Arc<InvitationService>,
        owner: User,
        project: Project,
    }

    fn build(repos: &Repositories, notifications: Arc<dyn NotificationServiceTrait>) -> InvitationService {
        InvitationService::new(
            repos.invitations.clone(),
            repos.projects.clone(),
            repos.members.clone(),
            repos.users.clone(),
            notifications,
        )
    }

    async fn fixture() -> Fixture {
        let repos = StorageFactory::in_memory();
        let notifications = Arc::new(NotificationService::new(repos.notifications.clone()));
        let service = Arc::new(build(&repos, notifications.clone()));
        let owner = user(&repos, "ani", UserRole::Student).await;
        let project = project(&repos, &owner, Semester::Odd).await;

        Fixture {
            repos,
            notifications,
            service,
            owner,
            project,
        }
    }

    async fn user(repos: &Repositories, name: &str, role: UserRole) -> User {
        let user = User::new(
            UserId::generate(),
            name,
            format!("{}@example.ac.id", name),
            role,
        )
        .unwrap()
        .with_github_username(format!("{}-gh", name))
        .unwrap();
        repos.users.create(user).await.unwrap()
    }

    async fn project(repos: &Repositories, owner: &User, semester: Semester) -> Project {
        let project = Project::new(
            *owner.id(),
            format!("Project of {}", owner.name()),
            Term::new(semester, "2024/2025").unwrap(),
        )
        .unwrap();
        repos.projects.create(project).await.unwrap()
    }

    fn request(invitee: &User) -> SendInvitationRequest {
        SendInvitationRequest {
            invitee_id: *invitee.id(),
            message: Some("Join our team!".to_string()),
        }
    }

    async fn send(f: &Fixture, invitee: &User) -> Result<SendOutcome, DomainError> {
        f.service
            .send(&f.owner, f.project.id(), request(invitee))
            .await
    }

    async fn pair_rows(f: &Fixture, invitee: &User) -> Vec<TeamInvitation> {
        f.repos
            .invitations
            .find_for_pair(f.project.id(), invitee.id())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_send_creates_pending_invitation_and_notifies() {
        let f = fixture().await;
        let budi = user(&f.repos, "budi", UserRole::Student).await;

        let outcome = send(&f, &budi).await.unwrap();

        assert!(outcome.notified);
        let invitation = outcome.invitation;
        assert!(invitation.is_pending());
        assert_eq!(invitation.message(), Some("Join our team!"));
        assert_eq!(
            invitation.expires_at() - invitation.created_at(),
            Duration::days(DEFAULT_INVITATION_TTL_DAYS)
        );

        let inbox = f.notifications.list(&budi, true).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind(), NotificationKind::TeamInvitation);
    }

    #[tokio::test]
    async fn test_send_preconditions() {
        let f = fixture().await;
        let budi = user(&f.repos, "budi", UserRole::Student).await;
        let lecturer = user(&f.repos, "joko", UserRole::Lecturer).await;

        let not_owner = f
            .service
            .send(&budi, f.project.id(), request(&lecturer))
            .await;
        assert!(matches!(not_owner, Err(DomainError::Forbidden { .. })));

        let self_invite = send(&f, &f.owner.clone()).await;
        assert!(matches!(self_invite, Err(DomainError::Validation { .. })));

        let wrong_role = send(&f, &lecturer).await;
        assert!(matches!(wrong_role, Err(DomainError::Validation { .. })));

        let missing_user = f
            .service
            .send(
                &f.owner,
                f.project.id(),
                SendInvitationRequest {
                    invitee_id: UserId::generate(),
                    message: None,
                },
            )
            .await;
        assert!(matches!(missing_user, Err(DomainError::NotFound { .. })));

        let missing_project = f
            .service
            .send(&f.owner, &ProjectId::generate(), request(&budi))
            .await;
        assert!(matches!(missing_project, Err(DomainError::NotFound { .. })));

        let long_message = f
            .service
            .send(
                &f.owner,
                f.project.id(),
                SendInvitationRequest {
                    invitee_id: *budi.id(),
                    message: Some("x".repeat(501)),
                },
            )
            .await;
        assert!(matches!(long_message, Err(DomainError::Validation { .. })));

        assert!(pair_rows(&f, &budi).await.is_empty());
    }

    #[tokio::test]
    async fn test_one_pending_invitation_per_pair() {
        let f = fixture().await;
        let budi = user(&f.repos, "budi", UserRole::Student).await;

        send(&f, &budi).await.unwrap();
        let duplicate = send(&f, &budi).await;

        assert!(matches!(duplicate, Err(DomainError::Conflict { .. })));
        assert_eq!(pair_rows(&f, &budi).await.len(), 1);
    }

    #[tokio::test]
    async fn test_invite_accept_then_reinvite_fails() {
        let f = fixture().await;
        let budi = user(&f.repos, "budi", UserRole::Student).await;

        let invitation = send(&f, &budi).await.unwrap().invitation;
        let accepted = f
            .service
            .respond(&budi, invitation.id(), InvitationAction::Accept)
            .await
            .unwrap();

        assert_eq!(accepted.status(), InvitationStatus::Accepted);
        assert!(accepted.responded_at().is_some());

        let member = f
            .repos
            .members
            .find(f.project.id(), budi.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(member.name(), "budi");
        assert_eq!(member.github_username(), Some("budi-gh"));

        let inbox = f.notifications.list(&f.owner, true).await.unwrap();
        assert_eq!(inbox[0].kind(), NotificationKind::InvitationAccepted);

        let again = send(&f, &budi).await;
        assert!(matches!(again, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_reject_then_reinvite_supersedes() {
        let f = fixture().await;
        let budi = user(&f.repos, "budi", UserRole::Student).await;

        let first = send(&f, &budi).await.unwrap().invitation;
        let rejected = f
            .service
            .respond(&budi, first.id(), InvitationAction::Reject)
            .await
            .unwrap();
        assert_eq!(rejected.status(), InvitationStatus::Rejected);

        let inbox = f.notifications.list(&f.owner, true).await.unwrap();
        assert_eq!(inbox[0].kind(), NotificationKind::InvitationRejected);

        let second = send(&f, &budi).await.unwrap().invitation;

        let rows = pair_rows(&f, &budi).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id(), second.id());
        assert!(rows[0].is_pending());
    }

    #[tokio::test]
    async fn test_cap_exceeded_with_three_members() {
        let f = fixture().await;

        for name in ["budi", "citra", "dodi"] {
            let student = user(&f.repos, name, UserRole::Student).await;
            let invitation = send(&f, &student).await.unwrap().invitation;
            f.service
                .respond(&student, invitation.id(), InvitationAction::Accept)
                .await
                .unwrap();
        }

        let eka = user(&f.repos, "eka", UserRole::Student).await;
        let result = send(&f, &eka).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert!(pair_rows(&f, &eka).await.is_empty());
        assert_eq!(
            f.repos.members.count_by_project(f.project.id()).await.unwrap(),
            3
        );
    }

    #[tokio::test]
    async fn test_cap_counts_pending_invitations() {
        let f = fixture().await;

        for name in ["budi", "citra", "dodi"] {
            let student = user(&f.repos, name, UserRole::Student).await;
            send(&f, &student).await.unwrap();
        }

        let eka = user(&f.repos, "eka", UserRole::Student).await;
        assert!(send(&f, &eka).await.is_err());

        let taken = f.repos.members.count_by_project(f.project.id()).await.unwrap()
            + f.repos
                .invitations
                .count_pending_by_project(f.project.id())
                .await
                .unwrap();
        assert!(taken <= DEFAULT_MAX_TEAM_MEMBERS);
    }

    #[tokio::test]
    async fn test_configured_cap() {
        let repos = StorageFactory::in_memory();
        let notifications = Arc::new(NotificationService::new(repos.notifications.clone()));
        let service = build(&repos, notifications).with_config(TeamPolicyConfig {
            max_members: 1,
            invitation_ttl_days: 14,
        });
        let owner = user(&repos, "ani", UserRole::Student).await;
        let project = project(&repos, &owner, Semester::Odd).await;
        let budi = user(&repos, "budi", UserRole::Student).await;
        let citra = user(&repos, "citra", UserRole::Student).await;

        let outcome = service
            .send(&owner, project.id(), request(&budi))
            .await
            .unwrap();
        assert_eq!(
            outcome.invitation.expires_at() - outcome.invitation.created_at(),
            Duration::days(14)
        );

        let full = service.send(&owner, project.id(), request(&citra)).await;
        assert!(matches!(full, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_semester_conflict_blocks_accept() {
        let f = fixture().await;
        let budi = user(&f.repos, "budi", UserRole::Student).await;
        project(&f.repos, &budi, Semester::Odd).await;

        let invitation = send(&f, &budi).await.unwrap().invitation;
        let result = f
            .service
            .respond(&budi, invitation.id(), InvitationAction::Accept)
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert!(!f
            .repos
            .members
            .is_member(f.project.id(), budi.id())
            .await
            .unwrap());
        let stored = f.repos.invitations.get(invitation.id()).await.unwrap().unwrap();
        assert!(stored.is_pending());
        assert!(f.notifications.list(&f.owner, false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_membership_in_same_term_blocks_accept() {
        let f = fixture().await;
        let other_owner = user(&f.repos, "rudi", UserRole::Student).await;
        let other = project(&f.repos, &other_owner, Semester::Odd).await;
        let later = project(&f.repos, &other_owner, Semester::Even).await;
        let budi = user(&f.repos, "budi", UserRole::Student).await;

        let first = f
            .service
            .send(&other_owner, other.id(), request(&budi))
            .await
            .unwrap()
            .invitation;
        f.service
            .respond(&budi, first.id(), InvitationAction::Accept)
            .await
            .unwrap();

        let second = send(&f, &budi).await.unwrap().invitation;
        let blocked = f
            .service
            .respond(&budi, second.id(), InvitationAction::Accept)
            .await;
        assert!(matches!(blocked, Err(DomainError::Conflict { .. })));

        let next_term = f
            .service
            .send(&other_owner, later.id(), request(&budi))
            .await
            .unwrap()
            .invitation;
        assert!(f
            .service
            .respond(&budi, next_term.id(), InvitationAction::Accept)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_only_invitee_responds_once() {
        let f = fixture().await;
        let budi = user(&f.repos, "budi", UserRole::Student).await;
        let invitation = send(&f, &budi).await.unwrap().invitation;

        let by_owner = f
            .service
            .respond(&f.owner, invitation.id(), InvitationAction::Accept)
            .await;
        assert!(matches!(by_owner, Err(DomainError::Forbidden { .. })));

        f.service
            .respond(&budi, invitation.id(), InvitationAction::Reject)
            .await
            .unwrap();

        let twice = f
            .service
            .respond(&budi, invitation.id(), InvitationAction::Accept)
            .await;
        assert!(matches!(twice, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_accepts_have_one_winner() {
        let f = fixture().await;
        let budi = user(&f.repos, "budi", UserRole::Student).await;
        let invitation = send(&f, &budi).await.unwrap().invitation;

        let first = {
            let service = f.service.clone();
            let budi = budi.clone();
            let id = *invitation.id();
            tokio::spawn(async move { service.respond(&budi, &id, InvitationAction::Accept).await })
        };
        let second = {
            let service = f.service.clone();
            let budi = budi.clone();
            let id = *invitation.id();
            tokio::spawn(async move { service.respond(&budi, &id, InvitationAction::Accept).await })
        };

        let results = [first.await.unwrap(), second.await.unwrap()];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            f.repos.members.count_by_project(f.project.id()).await.unwrap(),
            1
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_accepts_in_same_term_have_one_winner() {
        let f = fixture().await;
        let budi = user(&f.repos, "budi", UserRole::Student).await;
        let dimas = user(&f.repos, "dimas", UserRole::Student).await;
        let rival = project(&f.repos, &dimas, Semester::Odd).await;

        let first = send(&f, &budi).await.unwrap().invitation;
        let second = f
            .service
            .send(&dimas, rival.id(), request(&budi))
            .await
            .unwrap()
            .invitation;

        let tasks: Vec<_> = [*first.id(), *second.id()]
            .into_iter()
            .map(|id| {
                let service = f.service.clone();
                let budi = budi.clone();
                tokio::spawn(async move { service.respond(&budi, &id, InvitationAction::Accept).await })
            })
            .collect();

        let mut results = Vec::new();
        for task in tasks {
            results.push(task.await.unwrap());
        }

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(DomainError::Conflict { .. }))));

        let joined = f
            .repos
            .projects
            .find_joined_in_term(budi.id(), f.project.term())
            .await
            .unwrap();
        assert_eq!(joined.len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_only_pending_by_inviter() {
        let f = fixture().await;
        let budi = user(&f.repos, "budi", UserRole::Student).await;
        let citra = user(&f.repos, "citra", UserRole::Student).await;

        let invitation = send(&f, &budi).await.unwrap().invitation;
        let by_invitee = f.service.cancel(&budi, invitation.id()).await;
        assert!(matches!(by_invitee, Err(DomainError::Forbidden { .. })));

        f.service.cancel(&f.owner, invitation.id()).await.unwrap();
        assert!(pair_rows(&f, &budi).await.is_empty());

        let answered = send(&f, &citra).await.unwrap().invitation;
        f.service
            .respond(&citra, answered.id(), InvitationAction::Accept)
            .await
            .unwrap();
        let too_late = f.service.cancel(&f.owner, answered.id()).await;
        assert!(matches!(too_late, Err(DomainError::Conflict { .. })));

        let missing = f.service.cancel(&f.owner, &InvitationId::generate()).await;
        assert!(matches!(missing, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_visibility_and_listing() {
        let f = fixture().await;
        let budi = user(&f.repos, "budi", UserRole::Student).await;
        let citra = user(&f.repos, "citra", UserRole::Student).await;

        let pending = send(&f, &budi).await.unwrap().invitation;
        let answered = send(&f, &citra).await.unwrap().invitation;
        f.service
            .respond(&citra, answered.id(), InvitationAction::Reject)
            .await
            .unwrap();

        let details = f.service.get(&budi, pending.id()).await.unwrap();
        assert_eq!(details.project.unwrap().id(), f.project.id());
        assert_eq!(details.inviter.unwrap().id(), f.owner.id());
        assert!(f.service.get(&f.owner, pending.id()).await.is_ok());
        let stranger = f.service.get(&citra, pending.id()).await;
        assert!(matches!(stranger, Err(DomainError::Forbidden { .. })));

        let received = f.service.list_received(&budi).await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(f.service.list_received(&citra).await.unwrap().is_empty());

        let all = f
            .service
            .list_for_project(&f.owner, f.project.id())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        let denied = f.service.list_for_project(&budi, f.project.id()).await;
        assert!(matches!(denied, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_notification_failure_is_soft() {
        let repos = StorageFactory::in_memory();
        let mut failing = MockNotificationRepository::new();
        failing
            .expect_create()
            .returning(|_| Err(DomainError::storage("notifications table unavailable")));
        let notifications = Arc::new(NotificationService::new(Arc::new(failing)));
        let service = build(&repos, notifications);

        let owner = user(&repos, "ani", UserRole::Student).await;
        let project = project(&repos, &owner, Semester::Odd).await;
        let budi = user(&repos, "budi", UserRole::Student).await;

        let outcome = service
            .send(&owner, project.id(), request(&budi))
            .await
            .unwrap();

        assert!(!outcome.notified);
        assert!(repos
            .invitations
            .get(outcome.invitation.id())
            .await
            .unwrap()
            .is_some());
    }
}
