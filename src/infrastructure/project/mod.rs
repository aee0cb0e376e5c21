//! Project infrastructure

mod in_memory;
mod postgres;
mod service;

pub use in_memory::{InMemoryProjectMemberRepository, InMemoryProjectRepository};
pub(crate) use postgres::insert_member;
pub use postgres::{PostgresProjectMemberRepository, PostgresProjectRepository};
pub(crate) use service::ensure_free_in_term;
pub use service::{CreateProjectRequest, ProjectDetails, ProjectService, ProjectServiceTrait};
