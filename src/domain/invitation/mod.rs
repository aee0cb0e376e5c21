//! Team invitation domain
//!
//! Offer / accept / reject protocol for joining a project team.

mod entity;
mod repository;

pub use entity::{
    InvitationAction, InvitationError, InvitationId, InvitationStatus, TeamInvitation,
};
pub use repository::TeamInvitationRepository;
