//! Team membership records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::ProjectId;
use crate::domain::id::uuid_id;
use crate::domain::user::{User, UserId};

uuid_id!(
    /// Project member identifier
    MemberId,
    "member"
);

/// Role tag of a team member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Leader,
    #[default]
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leader => "leader",
            Self::Member => "member",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "leader" => Some(Self::Leader),
            "member" => Some(Self::Member),
            _ => None,
        }
    }
}

/// A student attached to a project's team, distinct from the owner.
///
/// Display identity (name, GitHub login, avatar) is copied from the user at
/// join time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMember {
    id: MemberId,
    project_id: ProjectId,
    user_id: UserId,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    github_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<String>,
    role: MemberRole,
    joined_at: DateTime<Utc>,
}

impl ProjectMember {
    /// Build a regular member row for a user joining a project
    pub fn join(project_id: ProjectId, user: &User) -> Self {
        Self {
            id: MemberId::generate(),
            project_id,
            user_id: *user.id(),
            name: user.name().to_string(),
            github_username: user.github_username().map(String::from),
            avatar_url: user.avatar_url().map(String::from),
            role: MemberRole::Member,
            joined_at: Utc::now(),
        }
    }

    /// Rebuild a member from persisted fields
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: MemberId,
        project_id: ProjectId,
        user_id: UserId,
        name: String,
        github_username: Option<String>,
        avatar_url: Option<String>,
        role: MemberRole,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            project_id,
            user_id,
            name,
            github_username,
            avatar_url,
            role,
            joined_at,
        }
    }

    pub fn id(&self) -> &MemberId {
        &self.id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn github_username(&self) -> Option<&str> {
        self.github_username.as_deref()
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn role(&self) -> MemberRole {
        self.role
    }

    pub fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserRole;

    #[test]
    fn test_join_copies_display_identity() {
        let user = User::new(
            UserId::generate(),
            "Sari",
            "sari@students.example.ac.id",
            UserRole::Student,
        )
        .unwrap()
        .with_github_username("sari-dev")
        .unwrap()
        .with_avatar_url("https://avatars.example.com/sari.png");
        let project_id = ProjectId::generate();

        let member = ProjectMember::join(project_id, &user);

        assert_eq!(member.project_id(), &project_id);
        assert_eq!(member.user_id(), user.id());
        assert_eq!(member.name(), "Sari");
        assert_eq!(member.github_username(), Some("sari-dev"));
        assert_eq!(member.avatar_url(), Some("https://avatars.example.com/sari.png"));
        assert_eq!(member.role(), MemberRole::Member);
    }
}
