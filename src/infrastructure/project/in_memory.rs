//! In-memory project and member repositories

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::project::{
    Project, ProjectId, ProjectMember, ProjectMemberRepository, ProjectRepository, Term,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::{InMemoryDatabase, Tables};

#[derive(Debug, Clone)]
pub struct InMemoryProjectRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryProjectRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

fn most_recent_first(mut projects: Vec<Project>) -> Vec<Project> {
    projects.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    projects
}

fn joined_projects<'a>(
    tables: &'a Tables,
    user_id: &'a UserId,
) -> impl Iterator<Item = &'a Project> + 'a {
    tables
        .members
        .values()
        .filter(move |m| m.user_id() == user_id)
        .filter_map(|m| tables.projects.get(m.project_id()))
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn get(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        Ok(self.db.read().await.projects.get(id).cloned())
    }

    async fn get_many(&self, ids: &[ProjectId]) -> Result<Vec<Project>, DomainError> {
        let tables = self.db.read().await;

        Ok(ids
            .iter()
            .filter_map(|id| tables.projects.get(id).cloned())
            .collect())
    }

    async fn create(&self, project: Project) -> Result<Project, DomainError> {
        let mut tables = self.db.write().await;

        if tables.projects.contains_key(project.id()) {
            return Err(DomainError::conflict(format!(
                "Project '{}' already exists",
                project.id()
            )));
        }

        tables.projects.insert(*project.id(), project.clone());
        Ok(project)
    }

    async fn list_owned_by(&self, owner_id: &UserId) -> Result<Vec<Project>, DomainError> {
        let tables = self.db.read().await;

        Ok(most_recent_first(
            tables
                .projects
                .values()
                .filter(|p| p.is_owned_by(owner_id))
                .cloned()
                .collect(),
        ))
    }

    async fn list_joined_by(&self, user_id: &UserId) -> Result<Vec<Project>, DomainError> {
        let tables = self.db.read().await;

        Ok(most_recent_first(
            joined_projects(&tables, user_id).cloned().collect(),
        ))
    }

    async fn find_owned_in_term(
        &self,
        owner_id: &UserId,
        term: &Term,
    ) -> Result<Vec<Project>, DomainError> {
        let tables = self.db.read().await;

        Ok(tables
            .projects
            .values()
            .filter(|p| p.is_owned_by(owner_id) && p.term() == term)
            .cloned()
            .collect())
    }

    async fn find_joined_in_term(
        &self,
        user_id: &UserId,
        term: &Term,
    ) -> Result<Vec<Project>, DomainError> {
        let tables = self.db.read().await;

        Ok(joined_projects(&tables, user_id)
            .filter(|p| p.term() == term)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryProjectMemberRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryProjectMemberRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectMemberRepository for InMemoryProjectMemberRepository {
    async fn list_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<ProjectMember>, DomainError> {
        let tables = self.db.read().await;

        let mut members: Vec<ProjectMember> =
            tables.project_members(project_id).cloned().collect();
        members.sort_by_key(|m| m.joined_at());

        Ok(members)
    }

    async fn count_by_project(&self, project_id: &ProjectId) -> Result<usize, DomainError> {
        Ok(self.db.read().await.project_members(project_id).count())
    }

    async fn find(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> Result<Option<ProjectMember>, DomainError> {
        let tables = self.db.read().await;

        Ok(tables
            .project_members(project_id)
            .find(|m| m.user_id() == user_id)
            .cloned())
    }

    async fn add(&self, member: ProjectMember) -> Result<ProjectMember, DomainError> {
        let mut tables = self.db.write().await;

        if !tables.projects.contains_key(member.project_id()) {
            return Err(DomainError::not_found(format!(
                "Project '{}' not found",
                member.project_id()
            )));
        }

        if tables.is_member(member.project_id(), member.user_id()) {
            return Err(DomainError::conflict(
                "User is already a member of this project",
            ));
        }

        tables.members.insert(*member.id(), member.clone());
        Ok(member)
    }

    async fn remove(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        let mut tables = self.db.write().await;

        let member_id = tables
            .project_members(project_id)
            .find(|m| m.user_id() == user_id)
            .map(|m| *m.id());

        Ok(member_id
            .and_then(|id| tables.members.remove(&id))
            .is_some())
    }
}
