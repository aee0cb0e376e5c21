//! In-memory database shared by the in-memory repositories

use std::collections::HashMap;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::invitation::{InvitationId, TeamInvitation};
use crate::domain::notification::{Notification, NotificationId};
use crate::domain::project::{MemberId, Project, ProjectId, ProjectMember, Term};
use crate::domain::user::{User, UserId};

/// Every table of the in-memory backend
#[derive(Debug, Default)]
pub struct Tables {
    pub users: HashMap<UserId, User>,
    pub projects: HashMap<ProjectId, Project>,
    pub members: HashMap<MemberId, ProjectMember>,
    pub invitations: HashMap<InvitationId, TeamInvitation>,
    pub notifications: HashMap<NotificationId, Notification>,
}

impl Tables {
    /// Member rows of one project
    pub fn project_members<'a>(
        &'a self,
        project_id: &'a ProjectId,
    ) -> impl Iterator<Item = &'a ProjectMember> + 'a {
        self.members
            .values()
            .filter(move |m| m.project_id() == project_id)
    }

    pub fn is_member(&self, project_id: &ProjectId, user_id: &UserId) -> bool {
        self.project_members(project_id)
            .any(|m| m.user_id() == user_id)
    }

    /// True when the user owns or has joined any project in `term`
    pub fn holds_team_in_term(&self, user_id: &UserId, term: &Term) -> bool {
        let owns = self
            .projects
            .values()
            .any(|p| p.is_owned_by(user_id) && p.term() == term);

        owns || self
            .members
            .values()
            .filter(|m| m.user_id() == user_id)
            .filter_map(|m| self.projects.get(m.project_id()))
            .any(|p| p.term() == term)
    }
}

/// Thread-safe in-memory database
///
/// All tables sit behind one lock, so a write guard spans a whole unit of
/// work. Useful for testing and development. Data is lost when the process
/// terminates.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    tables: RwLock<Tables>,
}

impl InMemoryDatabase {
    /// Creates a new empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared access to every table
    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    /// Exclusive access to every table
    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserRole;

    #[tokio::test]
    async fn test_write_then_read() {
        let db = InMemoryDatabase::new();
        let user = User::new(
            UserId::generate(),
            "Budi",
            "budi@example.ac.id",
            UserRole::Student,
        )
        .unwrap();
        let id = *user.id();

        db.write().await.users.insert(id, user);

        let tables = db.read().await;
        assert_eq!(tables.users.get(&id).unwrap().name(), "Budi");
        assert!(tables.projects.is_empty());
    }
}
