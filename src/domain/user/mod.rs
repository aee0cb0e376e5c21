//! User domain
//!
//! Students, lecturers and administrators. Only students own projects and
//! join teams.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId, UserRole, UserStatus};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_github_username, validate_user_name, UserValidationError,
};
