//! Project service for team ownership and membership

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::notification::{Notification, NotificationKind};
use crate::domain::policy;
use crate::domain::project::{
    Project, ProjectId, ProjectMember, ProjectMemberRepository, ProjectRepository, Term,
};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::notification::NotificationServiceTrait;

/// Request for creating a new project
#[derive(Debug, Clone)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: Option<String>,
    pub term: Term,
}

/// A project with its owner and team members
#[derive(Debug, Clone)]
pub struct ProjectDetails {
    pub project: Project,
    pub owner: Option<User>,
    pub members: Vec<ProjectMember>,
}

/// Trait for project service operations
#[async_trait]
pub trait ProjectServiceTrait: Send + Sync {
    /// Create a project owned by the caller
    async fn create(&self, user: &User, request: CreateProjectRequest)
        -> Result<Project, DomainError>;

    /// Get a project visible to the caller, with its team
    async fn get(&self, user: &User, id: &ProjectId) -> Result<ProjectDetails, DomainError>;

    /// Projects the caller owns or has joined, most recent first
    async fn list_mine(&self, user: &User) -> Result<Vec<Project>, DomainError>;

    /// Remove a member from a project the caller owns
    async fn remove_member(
        &self,
        user: &User,
        project_id: &ProjectId,
        member_id: &UserId,
    ) -> Result<(), DomainError>;
}

/// Fails when the user already owns or has joined a project in the term
pub(crate) async fn ensure_free_in_term(
    projects: &dyn ProjectRepository,
    user_id: &UserId,
    term: &Term,
) -> Result<(), DomainError> {
    if !projects.find_owned_in_term(user_id, term).await?.is_empty() {
        return Err(DomainError::conflict(format!(
            "You already own a project in {}",
            term
        )));
    }

    if !projects.find_joined_in_term(user_id, term).await?.is_empty() {
        return Err(DomainError::conflict(format!(
            "You are already a member of a project in {}",
            term
        )));
    }

    Ok(())
}

/// Project service for team ownership and membership
pub struct ProjectService {
    projects: Arc<dyn ProjectRepository>,
    members: Arc<dyn ProjectMemberRepository>,
    users: Arc<dyn UserRepository>,
    notifications: Arc<dyn NotificationServiceTrait>,
}

impl ProjectService {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        members: Arc<dyn ProjectMemberRepository>,
        users: Arc<dyn UserRepository>,
        notifications: Arc<dyn NotificationServiceTrait>,
    ) -> Self {
        Self {
            projects,
            members,
            users,
            notifications,
        }
    }

    async fn require_project(&self, id: &ProjectId) -> Result<Project, DomainError> {
        self.projects
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Project '{}' not found", id)))
    }
}

impl std::fmt::Debug for ProjectService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectService")
            .field("projects", &self.projects)
            .field("members", &self.members)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProjectServiceTrait for ProjectService {
    async fn create(
        &self,
        user: &User,
        request: CreateProjectRequest,
    ) -> Result<Project, DomainError> {
        info!(owner_id = %user.id(), title = %request.title, term = %request.term, "Creating project");

        policy::create_project(user).into_result()?;

        let mut project = Project::new(*user.id(), request.title, request.term)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if let Some(description) = request.description {
            project = project
                .with_description(description)
                .map_err(|e| DomainError::validation(e.to_string()))?;
        }

        ensure_free_in_term(self.projects.as_ref(), user.id(), project.term()).await?;

        self.projects.create(project).await
    }

    async fn get(&self, user: &User, id: &ProjectId) -> Result<ProjectDetails, DomainError> {
        let project = self.require_project(id).await?;
        let members = self.members.list_by_project(id).await?;
        let is_member = members.iter().any(|m| m.user_id() == user.id());

        policy::view_project(&project, is_member, user).into_result()?;

        let owner = self.users.get(project.owner_id()).await?;

        Ok(ProjectDetails {
            project,
            owner,
            members,
        })
    }

    async fn list_mine(&self, user: &User) -> Result<Vec<Project>, DomainError> {
        let mut projects = self.projects.list_owned_by(user.id()).await?;

        for joined in self.projects.list_joined_by(user.id()).await? {
            if !projects.iter().any(|p| p.id() == joined.id()) {
                projects.push(joined);
            }
        }
        projects.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        debug!(user_id = %user.id(), count = projects.len(), "Listed projects");
        Ok(projects)
    }

    async fn remove_member(
        &self,
        user: &User,
        project_id: &ProjectId,
        member_id: &UserId,
    ) -> Result<(), DomainError> {
        let project = self.require_project(project_id).await?;
        policy::manage_project(&project, user).into_result()?;

        if !self.members.remove(project_id, member_id).await? {
            return Err(DomainError::not_found(format!(
                "User '{}' is not a member of this project",
                member_id
            )));
        }

        info!(project_id = %project_id, user_id = %member_id, "Removed project member");

        self.notifications
            .notify(
                Notification::new(
                    *member_id,
                    NotificationKind::MemberRemoved,
                    "Removed from team",
                    format!("You have been removed from the team of \"{}\"", project.title()),
                )
                .with_link("/projects"),
            )
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::Semester;
    use crate::domain::user::UserRole;
    use crate::infrastructure::notification::NotificationService;
    use crate::infrastructure::storage::{Repositories, StorageFactory};

    struct Fixture {
        repos: Repositories,
        notifications: Arc<NotificationService>,
        service: ProjectService,
    }

    fn fixture() -> Fixture {
        let repos = StorageFactory::in_memory();
        let notifications = Arc::new(NotificationService::new(repos.notifications.clone()));
        let service = ProjectService::new(
            repos.projects.clone(),
            repos.members.clone(),
            repos.users.clone(),
            notifications.clone(),
        );

        Fixture {
            repos,
            notifications,
            service,
        }
    }

    async fn user(repos: &Repositories, name: &str, role: UserRole) -> User {
        let user = User::new(
            UserId::generate(),
            name,
            format!("{}@example.ac.id", name.to_lowercase().replace(' ', ".")),
            role,
        )
        .unwrap();
        repos.users.create(user).await.unwrap()
    }

    fn request(title: &str, semester: Semester) -> CreateProjectRequest {
        CreateProjectRequest {
            title: title.to_string(),
            description: Some("Capstone".to_string()),
            term: Term::new(semester, "2024/2025").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_project_as_student() {
        let f = fixture();
        let owner = user(&f.repos, "Ayu", UserRole::Student).await;

        let project = f
            .service
            .create(&owner, request("Library System", Semester::Odd))
            .await
            .unwrap();

        assert!(project.is_owned_by(owner.id()));
        assert_eq!(project.description(), Some("Capstone"));
    }

    #[tokio::test]
    async fn test_lecturer_cannot_create_project() {
        let f = fixture();
        let lecturer = user(&f.repos, "Pak Joko", UserRole::Lecturer).await;

        let result = f
            .service
            .create(&lecturer, request("Library System", Semester::Odd))
            .await;

        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_one_owned_project_per_term() {
        let f = fixture();
        let owner = user(&f.repos, "Ayu", UserRole::Student).await;

        f.service
            .create(&owner, request("First", Semester::Odd))
            .await
            .unwrap();

        let same_term = f.service.create(&owner, request("Second", Semester::Odd)).await;
        assert!(matches!(same_term, Err(DomainError::Conflict { .. })));

        let other_term = f.service.create(&owner, request("Second", Semester::Even)).await;
        assert!(other_term.is_ok());
    }

    #[tokio::test]
    async fn test_get_project_visibility() {
        let f = fixture();
        let owner = user(&f.repos, "Ayu", UserRole::Student).await;
        let stranger = user(&f.repos, "Beni", UserRole::Student).await;
        let lecturer = user(&f.repos, "Pak Joko", UserRole::Lecturer).await;

        let project = f
            .service
            .create(&owner, request("Library System", Semester::Odd))
            .await
            .unwrap();

        let details = f.service.get(&owner, project.id()).await.unwrap();
        assert_eq!(details.owner.unwrap().id(), owner.id());
        assert!(details.members.is_empty());

        assert!(f.service.get(&lecturer, project.id()).await.is_ok());
        let denied = f.service.get(&stranger, project.id()).await;
        assert!(matches!(denied, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_remove_member_notifies_student() {
        let f = fixture();
        let owner = user(&f.repos, "Ayu", UserRole::Student).await;
        let member = user(&f.repos, "Citra", UserRole::Student).await;

        let project = f
            .service
            .create(&owner, request("Library System", Semester::Odd))
            .await
            .unwrap();
        f.repos
            .members
            .add(ProjectMember::join(*project.id(), &member))
            .await
            .unwrap();

        assert_eq!(f.service.list_mine(&member).await.unwrap().len(), 1);

        let denied = f
            .service
            .remove_member(&member, project.id(), member.id())
            .await;
        assert!(matches!(denied, Err(DomainError::Forbidden { .. })));

        f.service
            .remove_member(&owner, project.id(), member.id())
            .await
            .unwrap();

        assert!(f.service.list_mine(&member).await.unwrap().is_empty());
        let inbox = f.notifications.list(&member, true).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind(), NotificationKind::MemberRemoved);

        let again = f
            .service
            .remove_member(&owner, project.id(), member.id())
            .await;
        assert!(matches!(again, Err(DomainError::NotFound { .. })));
    }
}
