//! PostgreSQL team invitation repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use super::errors;
use crate::domain::invitation::{
    InvitationId, InvitationStatus, TeamInvitation, TeamInvitationRepository,
};
use crate::domain::notification::Notification;
use crate::domain::project::{ProjectId, ProjectMember, Term};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::notification::insert_notification;
use crate::infrastructure::project::insert_member;
use crate::infrastructure::storage::map_write_error;

const INVITATION_COLUMNS: &str = "id, project_id, inviter_id, invitee_id, status, message, \
     expires_at, created_at, responded_at";

/// PostgreSQL implementation of TeamInvitationRepository
///
/// Multi-row writes run in one transaction. Responses flip the row with a
/// conditional `UPDATE ... WHERE status = 'pending'`, which row-locks it, so
/// a concurrent second response finds nothing to update.
#[derive(Debug, Clone)]
pub struct PostgresTeamInvitationRepository {
    pool: PgPool,
}

impl PostgresTeamInvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))
    }

    async fn fetch_many(
        &self,
        query: &str,
        first: &Uuid,
        second: Option<&Uuid>,
    ) -> Result<Vec<TeamInvitation>, DomainError> {
        let mut query = sqlx::query(query).bind(*first);

        if let Some(second) = second {
            query = query.bind(*second);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list invitations: {}", e)))?;

        rows.iter().map(row_to_invitation).collect()
    }
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), DomainError> {
    tx.commit()
        .await
        .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))
}

/// Move a pending row to its answered state inside `tx`
///
/// Fails with `NotFound` or `Conflict` when the stored row is absent or no
/// longer pending.
async fn mark_responded(
    tx: &mut Transaction<'_, Postgres>,
    invitation: &TeamInvitation,
) -> Result<(), DomainError> {
    let result = sqlx::query(
        r#"
        UPDATE team_invitations
        SET status = $2, responded_at = $3
        WHERE id = $1 AND status = 'pending'
        "#,
    )
    .bind(invitation.id().as_uuid())
    .bind(invitation.status().as_str())
    .bind(invitation.responded_at())
    .execute(&mut **tx)
    .await
    .map_err(|e| DomainError::storage(format!("Failed to update invitation: {}", e)))?;

    if result.rows_affected() > 0 {
        return Ok(());
    }

    let status: Option<String> =
        sqlx::query_scalar("SELECT status FROM team_invitations WHERE id = $1")
            .bind(invitation.id().as_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get invitation: {}", e)))?;

    match status.as_deref().map(InvitationStatus::parse) {
        None => Err(errors::not_found(invitation.id())),
        Some(Some(status)) => Err(errors::already_responded(status)),
        Some(None) => Err(DomainError::storage("Invalid invitation status in database")),
    }
}

/// Fail when the user already owns or has joined a project in `term`
///
/// Locks the user's row first, so concurrent accepts by the same student
/// run this check one at a time.
async fn ensure_free_in_term(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &UserId,
    term: &Term,
) -> Result<(), DomainError> {
    sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to lock user: {}", e)))?;

    let taken: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM projects p
            WHERE p.owner_id = $1 AND p.semester = $2 AND p.academic_year = $3
            UNION ALL
            SELECT 1 FROM project_members m
            JOIN projects p ON p.id = m.project_id
            WHERE m.user_id = $1 AND p.semester = $2 AND p.academic_year = $3
        )
        "#,
    )
    .bind(user_id.as_uuid())
    .bind(term.semester().as_str())
    .bind(term.academic_year())
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| DomainError::storage(format!("Failed to check term membership: {}", e)))?;

    if taken {
        return Err(errors::team_taken_in_term(term));
    }

    Ok(())
}

#[async_trait]
impl TeamInvitationRepository for PostgresTeamInvitationRepository {
    async fn get(&self, id: &InvitationId) -> Result<Option<TeamInvitation>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM team_invitations WHERE id = $1",
            INVITATION_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get invitation: {}", e)))?;

        row.as_ref().map(row_to_invitation).transpose()
    }

    async fn list_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<TeamInvitation>, DomainError> {
        let query = format!(
            "SELECT {} FROM team_invitations WHERE project_id = $1 ORDER BY created_at DESC",
            INVITATION_COLUMNS
        );
        self.fetch_many(&query, project_id.as_uuid(), None).await
    }

    async fn list_pending_for_invitee(
        &self,
        invitee_id: &UserId,
    ) -> Result<Vec<TeamInvitation>, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM team_invitations
            WHERE invitee_id = $1 AND status = 'pending'
            ORDER BY created_at DESC
            "#,
            INVITATION_COLUMNS
        );
        self.fetch_many(&query, invitee_id.as_uuid(), None).await
    }

    async fn find_for_pair(
        &self,
        project_id: &ProjectId,
        invitee_id: &UserId,
    ) -> Result<Vec<TeamInvitation>, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM team_invitations
            WHERE project_id = $1 AND invitee_id = $2
            ORDER BY created_at DESC
            "#,
            INVITATION_COLUMNS
        );
        self.fetch_many(&query, project_id.as_uuid(), Some(invitee_id.as_uuid()))
            .await
    }

    async fn count_pending_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM team_invitations WHERE project_id = $1 AND status = 'pending'",
        )
        .bind(project_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to count invitations: {}", e)))?;

        Ok(count as usize)
    }

    async fn create(
        &self,
        invitation: TeamInvitation,
        supersedes: Option<InvitationId>,
        team_cap: usize,
    ) -> Result<TeamInvitation, DomainError> {
        let mut tx = self.begin().await?;

        // Serializes concurrent sends on the same project
        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
                .bind(invitation.project_id().as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to lock project: {}", e)))?;

        if locked.is_none() {
            return Err(DomainError::not_found(format!(
                "Project '{}' not found",
                invitation.project_id()
            )));
        }

        let taken: i64 = sqlx::query_scalar(
            r#"
            SELECT (SELECT COUNT(*) FROM project_members WHERE project_id = $1)
                 + (SELECT COUNT(*) FROM team_invitations
                    WHERE project_id = $1 AND status = 'pending')
            "#,
        )
        .bind(invitation.project_id().as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to count team size: {}", e)))?;

        if taken as usize >= team_cap {
            return Err(errors::team_full(team_cap));
        }

        if let Some(old_id) = supersedes {
            let result = sqlx::query(
                r#"
                DELETE FROM team_invitations
                WHERE id = $1 AND project_id = $2 AND invitee_id = $3 AND status = 'rejected'
                "#,
            )
            .bind(old_id.as_uuid())
            .bind(invitation.project_id().as_uuid())
            .bind(invitation.invitee_id().as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete invitation: {}", e)))?;

            if result.rows_affected() == 0 {
                return Err(DomainError::conflict(
                    "The previous invitation for this student changed, please retry",
                ));
            }
        }

        sqlx::query(
            r#"
            INSERT INTO team_invitations (id, project_id, inviter_id, invitee_id, status,
                                          message, expires_at, created_at, responded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(invitation.id().as_uuid())
        .bind(invitation.project_id().as_uuid())
        .bind(invitation.inviter_id().as_uuid())
        .bind(invitation.invitee_id().as_uuid())
        .bind(invitation.status().as_str())
        .bind(invitation.message())
        .bind(invitation.expires_at())
        .bind(invitation.created_at())
        .bind(invitation.responded_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_error) = e {
                if db_error.is_unique_violation() {
                    return errors::pending_exists();
                }
            }
            map_write_error(e, "Invitation already exists")
        })?;

        commit(tx).await?;
        Ok(invitation)
    }

    async fn accept(
        &self,
        invitation: &TeamInvitation,
        term: &Term,
        member: ProjectMember,
        notification: Notification,
    ) -> Result<TeamInvitation, DomainError> {
        let mut tx = self.begin().await?;

        ensure_free_in_term(&mut tx, member.user_id(), term).await?;
        mark_responded(&mut tx, invitation).await?;
        insert_member(&mut *tx, &member).await?;
        insert_notification(&mut *tx, &notification).await?;

        commit(tx).await?;
        Ok(invitation.clone())
    }

    async fn reject(
        &self,
        invitation: &TeamInvitation,
        notification: Notification,
    ) -> Result<TeamInvitation, DomainError> {
        let mut tx = self.begin().await?;

        mark_responded(&mut tx, invitation).await?;
        insert_notification(&mut *tx, &notification).await?;

        commit(tx).await?;
        Ok(invitation.clone())
    }

    async fn cancel(&self, id: &InvitationId) -> Result<(), DomainError> {
        let result =
            sqlx::query("DELETE FROM team_invitations WHERE id = $1 AND status = 'pending'")
                .bind(id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to cancel invitation: {}", e)))?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        match self.get(id).await? {
            None => Err(errors::not_found(id)),
            Some(stored) => Err(errors::already_responded(stored.status())),
        }
    }
}

fn row_to_invitation(row: &sqlx::postgres::PgRow) -> Result<TeamInvitation, DomainError> {
    let id: Uuid = row.get("id");
    let project_id: Uuid = row.get("project_id");
    let inviter_id: Uuid = row.get("inviter_id");
    let invitee_id: Uuid = row.get("invitee_id");
    let status: String = row.get("status");
    let expires_at: DateTime<Utc> = row.get("expires_at");
    let created_at: DateTime<Utc> = row.get("created_at");
    let responded_at: Option<DateTime<Utc>> = row.get("responded_at");

    let status = InvitationStatus::parse(&status).ok_or_else(|| {
        DomainError::storage(format!("Invalid invitation status in database: {}", status))
    })?;

    Ok(TeamInvitation::restore(
        InvitationId::from_uuid(id),
        ProjectId::from_uuid(project_id),
        UserId::from_uuid(inviter_id),
        UserId::from_uuid(invitee_id),
        status,
        row.get("message"),
        expires_at,
        created_at,
        responded_at,
    ))
}
