//! Project and membership repository traits

use async_trait::async_trait;

use super::entity::{Project, ProjectId, Term};
use super::member::ProjectMember;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for projects
#[async_trait]
pub trait ProjectRepository: Send + Sync + std::fmt::Debug {
    /// Get a project by ID
    async fn get(&self, id: &ProjectId) -> Result<Option<Project>, DomainError>;

    /// Get several projects at once; missing ids are skipped
    async fn get_many(&self, ids: &[ProjectId]) -> Result<Vec<Project>, DomainError>;

    /// Create a new project
    async fn create(&self, project: Project) -> Result<Project, DomainError>;

    /// Projects owned by a user, most recent first
    async fn list_owned_by(&self, owner_id: &UserId) -> Result<Vec<Project>, DomainError>;

    /// Projects a user has joined as a member, most recent first
    async fn list_joined_by(&self, user_id: &UserId) -> Result<Vec<Project>, DomainError>;

    /// Projects owned by a user in the given term
    async fn find_owned_in_term(
        &self,
        owner_id: &UserId,
        term: &Term,
    ) -> Result<Vec<Project>, DomainError>;

    /// Projects a user has joined as a member in the given term
    async fn find_joined_in_term(
        &self,
        user_id: &UserId,
        term: &Term,
    ) -> Result<Vec<Project>, DomainError>;
}

/// Repository for project team members
#[async_trait]
pub trait ProjectMemberRepository: Send + Sync + std::fmt::Debug {
    /// Members of a project, in join order
    async fn list_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<ProjectMember>, DomainError>;

    /// Number of members on a project (the owner is not counted)
    async fn count_by_project(&self, project_id: &ProjectId) -> Result<usize, DomainError>;

    /// Membership row for a user on a project
    async fn find(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> Result<Option<ProjectMember>, DomainError>;

    /// Add a member directly. Invitation acceptance goes through
    /// `TeamInvitationRepository::accept` instead.
    async fn add(&self, member: ProjectMember) -> Result<ProjectMember, DomainError>;

    /// Remove a user from a project, returns true if a row was deleted
    async fn remove(&self, project_id: &ProjectId, user_id: &UserId)
        -> Result<bool, DomainError>;

    /// Check whether a user is on a project's team
    async fn is_member(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        Ok(self.find(project_id, user_id).await?.is_some())
    }
}
