//! Team invitation infrastructure

mod errors;
mod in_memory;
mod postgres;
mod service;

pub use in_memory::InMemoryTeamInvitationRepository;
pub use postgres::PostgresTeamInvitationRepository;
pub use service::{
    InvitationDetails, InvitationService, InvitationServiceTrait, SendInvitationRequest,
    SendOutcome, TeamPolicyConfig, DEFAULT_INVITATION_TTL_DAYS, DEFAULT_MAX_TEAM_MEMBERS,
};
