//! Project domain module
//!
//! A project belongs to one student (the leader) and carries a team of up to
//! a configured number of additional members, scoped to an academic term.

mod entity;
mod member;
mod repository;
mod validation;

pub use entity::{Project, ProjectId, ProjectStatus, Semester, Term};
pub use member::{MemberId, MemberRole, ProjectMember};
pub use repository::{ProjectMemberRepository, ProjectRepository};
pub use validation::{
    validate_academic_year, validate_project_description, validate_project_title,
    ProjectValidationError,
};
