//! PostgreSQL project and member repositories

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row};
use uuid::Uuid;

use crate::domain::project::{
    MemberId, MemberRole, Project, ProjectId, ProjectMember, ProjectMemberRepository,
    ProjectRepository, ProjectStatus, Semester, Term,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::map_write_error;

const PROJECT_COLUMNS: &str = "p.id, p.title, p.description, p.owner_id, p.status, p.semester, \
     p.academic_year, p.created_at, p.updated_at";

const MEMBER_COLUMNS: &str =
    "id, project_id, user_id, name, github_username, avatar_url, role, joined_at";

#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_projects(
        &self,
        query: &str,
        user_id: &UserId,
        term: Option<&Term>,
    ) -> Result<Vec<Project>, DomainError> {
        let mut query = sqlx::query(query).bind(*user_id.as_uuid());

        if let Some(term) = term {
            query = query
                .bind(term.semester().as_str())
                .bind(term.academic_year().to_string());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list projects: {}", e)))?;

        rows.iter().map(row_to_project).collect()
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn get(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM projects p WHERE p.id = $1",
            PROJECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get project: {}", e)))?;

        row.as_ref().map(row_to_project).transpose()
    }

    async fn get_many(&self, ids: &[ProjectId]) -> Result<Vec<Project>, DomainError> {
        let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query(&format!(
            "SELECT {} FROM projects p WHERE p.id = ANY($1)",
            PROJECT_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get projects: {}", e)))?;

        rows.iter().map(row_to_project).collect()
    }

    async fn create(&self, project: Project) -> Result<Project, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, title, description, owner_id, status, semester,
                                  academic_year, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(project.id().as_uuid())
        .bind(project.title())
        .bind(project.description())
        .bind(project.owner_id().as_uuid())
        .bind(project.status().as_str())
        .bind(project.term().semester().as_str())
        .bind(project.term().academic_year())
        .bind(project.created_at())
        .bind(project.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, format!("Project '{}' already exists", project.id())))?;

        Ok(project)
    }

    async fn list_owned_by(&self, owner_id: &UserId) -> Result<Vec<Project>, DomainError> {
        let query = format!(
            "SELECT {} FROM projects p WHERE p.owner_id = $1 ORDER BY p.created_at DESC",
            PROJECT_COLUMNS
        );
        self.fetch_projects(&query, owner_id, None).await
    }

    async fn list_joined_by(&self, user_id: &UserId) -> Result<Vec<Project>, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM projects p
            JOIN project_members m ON m.project_id = p.id
            WHERE m.user_id = $1
            ORDER BY p.created_at DESC
            "#,
            PROJECT_COLUMNS
        );
        self.fetch_projects(&query, user_id, None).await
    }

    async fn find_owned_in_term(
        &self,
        owner_id: &UserId,
        term: &Term,
    ) -> Result<Vec<Project>, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM projects p
            WHERE p.owner_id = $1 AND p.semester = $2 AND p.academic_year = $3
            "#,
            PROJECT_COLUMNS
        );
        self.fetch_projects(&query, owner_id, Some(term)).await
    }

    async fn find_joined_in_term(
        &self,
        user_id: &UserId,
        term: &Term,
    ) -> Result<Vec<Project>, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM projects p
            JOIN project_members m ON m.project_id = p.id
            WHERE m.user_id = $1 AND p.semester = $2 AND p.academic_year = $3
            "#,
            PROJECT_COLUMNS
        );
        self.fetch_projects(&query, user_id, Some(term)).await
    }
}

#[derive(Debug, Clone)]
pub struct PostgresProjectMemberRepository {
    pool: PgPool,
}

impl PostgresProjectMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Insert a member row using any executor, so it can join a transaction
pub(crate) async fn insert_member<'e, E>(
    executor: E,
    member: &ProjectMember,
) -> Result<(), DomainError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO project_members (id, project_id, user_id, name, github_username,
                                     avatar_url, role, joined_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(member.id().as_uuid())
    .bind(member.project_id().as_uuid())
    .bind(member.user_id().as_uuid())
    .bind(member.name())
    .bind(member.github_username())
    .bind(member.avatar_url())
    .bind(member.role().as_str())
    .bind(member.joined_at())
    .execute(executor)
    .await
    .map_err(|e| map_write_error(e, "User is already a member of this project"))?;

    Ok(())
}

#[async_trait]
impl ProjectMemberRepository for PostgresProjectMemberRepository {
    async fn list_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<ProjectMember>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM project_members WHERE project_id = $1 ORDER BY joined_at",
            MEMBER_COLUMNS
        ))
        .bind(project_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list members: {}", e)))?;

        rows.iter().map(row_to_member).collect()
    }

    async fn count_by_project(&self, project_id: &ProjectId) -> Result<usize, DomainError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM project_members WHERE project_id = $1")
                .bind(project_id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to count members: {}", e)))?;

        Ok(count as usize)
    }

    async fn find(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> Result<Option<ProjectMember>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM project_members WHERE project_id = $1 AND user_id = $2",
            MEMBER_COLUMNS
        ))
        .bind(project_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get member: {}", e)))?;

        row.as_ref().map(row_to_member).transpose()
    }

    async fn add(&self, member: ProjectMember) -> Result<ProjectMember, DomainError> {
        insert_member(&self.pool, &member).await?;
        Ok(member)
    }

    async fn remove(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                .bind(project_id.as_uuid())
                .bind(user_id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to remove member: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_project(row: &sqlx::postgres::PgRow) -> Result<Project, DomainError> {
    let id: Uuid = row.get("id");
    let owner_id: Uuid = row.get("owner_id");
    let status: String = row.get("status");
    let semester: String = row.get("semester");
    let academic_year: String = row.get("academic_year");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");

    let status = ProjectStatus::parse(&status).ok_or_else(|| {
        DomainError::storage(format!("Invalid project status in database: {}", status))
    })?;
    let semester = Semester::parse(&semester)
        .ok_or_else(|| DomainError::storage(format!("Invalid semester in database: {}", semester)))?;
    let term = Term::new(semester, academic_year)
        .map_err(|e| DomainError::storage(format!("Invalid term in database: {}", e)))?;

    Ok(Project::restore(
        ProjectId::from_uuid(id),
        row.get("title"),
        row.get("description"),
        UserId::from_uuid(owner_id),
        status,
        term,
        created_at,
        updated_at,
    ))
}

fn row_to_member(row: &sqlx::postgres::PgRow) -> Result<ProjectMember, DomainError> {
    let id: Uuid = row.get("id");
    let project_id: Uuid = row.get("project_id");
    let user_id: Uuid = row.get("user_id");
    let role: String = row.get("role");
    let joined_at: DateTime<Utc> = row.get("joined_at");

    let role = MemberRole::parse(&role)
        .ok_or_else(|| DomainError::storage(format!("Invalid member role in database: {}", role)))?;

    Ok(ProjectMember::restore(
        MemberId::from_uuid(id),
        ProjectId::from_uuid(project_id),
        UserId::from_uuid(user_id),
        row.get("name"),
        row.get("github_username"),
        row.get("avatar_url"),
        role,
        joined_at,
    ))
}
