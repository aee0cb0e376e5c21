//! Error messages shared by the invitation repositories and service

use crate::domain::invitation::{InvitationError, InvitationId, InvitationStatus};
use crate::domain::project::Term;
use crate::domain::DomainError;

pub(crate) fn not_found(id: &InvitationId) -> DomainError {
    DomainError::not_found(format!("Invitation '{}' not found", id))
}

pub(crate) fn pending_exists() -> DomainError {
    DomainError::conflict("A pending invitation already exists for this student")
}

pub(crate) fn already_responded(status: InvitationStatus) -> DomainError {
    InvitationError::AlreadyResponded(status).into()
}

pub(crate) fn team_full(cap: usize) -> DomainError {
    DomainError::validation(format!(
        "Team is full: at most {} members including pending invitations",
        cap
    ))
}

pub(crate) fn team_taken_in_term(term: &Term) -> DomainError {
    DomainError::conflict(format!(
        "Student already owns or belongs to a project in {}",
        term
    ))
}
