//! Project entity, status and academic term

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{
    validate_academic_year, validate_project_description, validate_project_title,
    ProjectValidationError,
};
use crate::domain::id::uuid_id;
use crate::domain::user::UserId;

uuid_id!(
    /// Project identifier
    ProjectId,
    "project"
);

/// Half of an academic year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Semester {
    /// First (odd) semester
    Odd,
    /// Second (even) semester
    Even,
}

impl Semester {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Odd => "odd",
            Self::Even => "even",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "odd" => Some(Self::Odd),
            "even" => Some(Self::Even),
            _ => None,
        }
    }
}

impl std::fmt::Display for Semester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Academic term: a semester within an academic year such as `2024/2025`.
///
/// Scopes the one-team-per-term rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    semester: Semester,
    academic_year: String,
}

impl Term {
    pub fn new(
        semester: Semester,
        academic_year: impl Into<String>,
    ) -> Result<Self, ProjectValidationError> {
        let academic_year = academic_year.into();
        validate_academic_year(&academic_year)?;

        Ok(Self {
            semester,
            academic_year,
        })
    }

    pub fn semester(&self) -> Semester {
        self.semester
    }

    pub fn academic_year(&self) -> &str {
        &self.academic_year
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.academic_year, self.semester)
    }
}

/// Review status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Submitted,
    InReview,
    RevisionNeeded,
    Approved,
    Rejected,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::InReview => "in_review",
            Self::RevisionNeeded => "revision_needed",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "in_review" => Some(Self::InReview),
            "revision_needed" => Some(Self::RevisionNeeded),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capstone project, owned by exactly one student who leads the team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Owning student, implicitly the team leader
    owner_id: UserId,
    status: ProjectStatus,
    term: Term,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new draft project
    pub fn new(
        owner_id: UserId,
        title: impl Into<String>,
        term: Term,
    ) -> Result<Self, ProjectValidationError> {
        let title = title.into();
        validate_project_title(&title)?;
        let now = Utc::now();

        Ok(Self {
            id: ProjectId::generate(),
            title,
            description: None,
            owner_id,
            status: ProjectStatus::Draft,
            term,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a project from persisted fields
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: ProjectId,
        title: String,
        description: Option<String>,
        owner_id: UserId,
        status: ProjectStatus,
        term: Term,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            owner_id,
            status,
            term,
            created_at,
            updated_at,
        }
    }

    /// Set the description (builder pattern)
    pub fn with_description(
        mut self,
        description: impl Into<String>,
    ) -> Result<Self, ProjectValidationError> {
        let description = description.into();
        validate_project_description(&description)?;
        self.description = Some(description);
        Ok(self)
    }

    // Getters

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }
}
