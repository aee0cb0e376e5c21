//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{
    validate_email, validate_github_username, validate_user_name, UserValidationError,
};
use crate::domain::id::uuid_id;

uuid_id!(
    /// User identifier
    UserId,
    "user"
);

/// Application-wide role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Student - can own projects and join teams
    #[default]
    Student,
    /// Lecturer - reviews and scores projects
    Lecturer,
    /// Administrator - manages users and assignments
    Admin,
}

impl UserRole {
    /// Only students take part in capstone teams
    pub fn can_join_teams(&self) -> bool {
        matches!(self, Self::Student)
    }

    /// Staff can read any project
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Lecturer | Self::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Lecturer => "lecturer",
            Self::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "student" => Some(Self::Student),
            "lecturer" => Some(Self::Lecturer),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// User is active and can sign in
    #[default]
    Active,
    /// User is temporarily suspended
    Suspended,
}

impl UserStatus {
    /// Check if the user can sign in
    pub fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    /// Display name
    name: String,
    email: String,
    /// GitHub login, used as the external identity of team members
    #[serde(skip_serializing_if = "Option::is_none")]
    github_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<String>,
    role: UserRole,
    status: UserStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        let email = email.into();
        validate_user_name(&name)?;
        validate_email(&email)?;
        let now = Utc::now();

        Ok(Self {
            id,
            name,
            email,
            github_username: None,
            avatar_url: None,
            role,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a user from persisted fields
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: UserId,
        name: String,
        email: String,
        github_username: Option<String>,
        avatar_url: Option<String>,
        role: UserRole,
        status: UserStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            github_username,
            avatar_url,
            role,
            status,
            created_at,
            updated_at,
        }
    }

    /// Set the GitHub login (builder pattern)
    pub fn with_github_username(
        mut self,
        username: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let username = username.into();
        validate_github_username(&username)?;
        self.github_username = Some(username);
        Ok(self)
    }

    /// Set the avatar URL (builder pattern)
    pub fn with_avatar_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn github_username(&self) -> Option<&str> {
        self.github_username.as_deref()
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_active(&self) -> bool {
        self.status.can_login()
    }

    pub fn is_student(&self) -> bool {
        self.role.can_join_teams()
    }

    // Mutators

    pub fn suspend(&mut self) {
        self.status = UserStatus::Suspended;
        self.touch();
    }

    pub fn activate(&mut self) {
        if self.status == UserStatus::Suspended {
            self.status = UserStatus::Active;
            self.touch();
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_student(name: &str) -> User {
        User::new(
            UserId::generate(),
            name,
            format!("{}@students.example.ac.id", name.to_lowercase()),
            UserRole::Student,
        )
        .unwrap()
    }

    #[test]
    fn test_user_creation() {
        let user = create_student("Budi");

        assert_eq!(user.name(), "Budi");
        assert_eq!(user.email(), "budi@students.example.ac.id");
        assert!(user.is_active());
        assert!(user.is_student());
        assert!(user.github_username().is_none());
    }

    #[test]
    fn test_user_with_github_identity() {
        let user = create_student("Sari")
            .with_github_username("sari-dev")
            .unwrap()
            .with_avatar_url("https://avatars.example.com/sari.png");

        assert_eq!(user.github_username(), Some("sari-dev"));
        assert_eq!(user.avatar_url(), Some("https://avatars.example.com/sari.png"));
    }

    #[test]
    fn test_invalid_github_username() {
        let result = create_student("Sari").with_github_username("-bad-");
        assert!(result.is_err());
    }

    #[test]
    fn test_roles() {
        assert!(UserRole::Student.can_join_teams());
        assert!(!UserRole::Lecturer.can_join_teams());
        assert!(!UserRole::Admin.can_join_teams());

        assert!(UserRole::Lecturer.is_staff());
        assert!(UserRole::Admin.is_staff());
        assert!(!UserRole::Student.is_staff());

        assert_eq!(UserRole::parse("lecturer"), Some(UserRole::Lecturer));
        assert_eq!(UserRole::parse("dean"), None);
    }

    #[test]
    fn test_status_changes() {
        let mut user = create_student("Budi");

        user.suspend();
        assert!(!user.is_active());
        assert_eq!(user.status(), UserStatus::Suspended);

        user.activate();
        assert!(user.is_active());
    }

    #[test]
    fn test_invalid_email() {
        let result = User::new(UserId::generate(), "Budi", "not-an-email", UserRole::Student);
        assert_eq!(result.unwrap_err(), UserValidationError::InvalidEmail);
    }
}
