//! Domain layer - entities, validation, repository traits and permission policy

pub mod error;
pub(crate) mod id;
pub mod invitation;
pub mod notification;
pub mod policy;
pub mod project;
pub mod user;

pub use error::DomainError;
pub use invitation::{
    InvitationAction, InvitationId, InvitationStatus, TeamInvitation, TeamInvitationRepository,
};
pub use notification::{Notification, NotificationId, NotificationKind, NotificationRepository};
pub use policy::Access;
pub use project::{
    MemberRole, Project, ProjectId, ProjectMember, ProjectMemberRepository, ProjectRepository,
    ProjectStatus, Semester, Term,
};
pub use user::{User, UserId, UserRepository, UserRole, UserStatus};
