//! Team invitation entity and lifecycle

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::id::uuid_id;
use crate::domain::project::ProjectId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

uuid_id!(
    /// Team invitation identifier
    InvitationId,
    "invitation"
);

const MAX_MESSAGE_LENGTH: usize = 500;

/// Lifecycle state of an invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    /// Kept for stored rows; nothing in this service moves an invitation here
    Expired,
}

impl InvitationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invitee's answer to an invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationAction {
    Accept,
    Reject,
}

/// Invalid invitation transitions and fields
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvitationError {
    #[error("Invitation has already been {0}")]
    AlreadyResponded(InvitationStatus),

    #[error("Invitation message cannot exceed {0} characters")]
    MessageTooLong(usize),
}

impl From<InvitationError> for DomainError {
    fn from(error: InvitationError) -> Self {
        match error {
            InvitationError::AlreadyResponded(_) => DomainError::conflict(error.to_string()),
            InvitationError::MessageTooLong(_) => DomainError::validation(error.to_string()),
        }
    }
}

/// A request from a project owner to a student to join the project's team.
///
/// Transitions are one-way: pending to accepted or rejected. Terminal
/// invitations are never mutated again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInvitation {
    id: InvitationId,
    project_id: ProjectId,
    inviter_id: UserId,
    invitee_id: UserId,
    status: InvitationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    /// Stored as a hint only; pending invitations stay answerable after it
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    responded_at: Option<DateTime<Utc>>,
}

impl TeamInvitation {
    /// Create a pending invitation expiring `ttl` from now
    pub fn new(
        project_id: ProjectId,
        inviter_id: UserId,
        invitee_id: UserId,
        message: Option<String>,
        ttl: Duration,
    ) -> Result<Self, InvitationError> {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        if let Some(ref m) = message {
            if m.chars().count() > MAX_MESSAGE_LENGTH {
                return Err(InvitationError::MessageTooLong(MAX_MESSAGE_LENGTH));
            }
        }

        let now = Utc::now();

        Ok(Self {
            id: InvitationId::generate(),
            project_id,
            inviter_id,
            invitee_id,
            status: InvitationStatus::Pending,
            message,
            expires_at: now + ttl,
            created_at: now,
            responded_at: None,
        })
    }

    /// Rebuild an invitation from persisted fields
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: InvitationId,
        project_id: ProjectId,
        inviter_id: UserId,
        invitee_id: UserId,
        status: InvitationStatus,
        message: Option<String>,
        expires_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
        responded_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            project_id,
            inviter_id,
            invitee_id,
            status,
            message,
            expires_at,
            created_at,
            responded_at,
        }
    }

    // Getters

    pub fn id(&self) -> &InvitationId {
        &self.id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn inviter_id(&self) -> &UserId {
        &self.inviter_id
    }

    pub fn invitee_id(&self) -> &UserId {
        &self.invitee_id
    }

    pub fn status(&self) -> InvitationStatus {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn responded_at(&self) -> Option<DateTime<Utc>> {
        self.responded_at
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    /// Whether the stored expiry has passed. Informational only.
    pub fn is_past_expiry(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    // Transitions

    /// Fail unless the invitation is still pending
    pub fn ensure_pending(&self) -> Result<(), InvitationError> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(InvitationError::AlreadyResponded(self.status))
        }
    }

    /// Apply the invitee's answer
    pub fn respond(&mut self, action: InvitationAction) -> Result<(), InvitationError> {
        self.ensure_pending()?;

        self.status = match action {
            InvitationAction::Accept => InvitationStatus::Accepted,
            InvitationAction::Reject => InvitationStatus::Rejected,
        };
        self.responded_at = Some(Utc::now());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> TeamInvitation {
        TeamInvitation::new(
            ProjectId::generate(),
            UserId::generate(),
            UserId::generate(),
            Some("Join us!".to_string()),
            Duration::days(7),
        )
        .unwrap()
    }

    #[test]
    fn test_new_invitation_is_pending_with_expiry() {
        let invitation = pending();

        assert!(invitation.is_pending());
        assert_eq!(invitation.message(), Some("Join us!"));
        assert_eq!(
            invitation.expires_at() - invitation.created_at(),
            Duration::days(7)
        );
        assert!(invitation.responded_at().is_none());
    }

    #[test]
    fn test_blank_message_is_dropped() {
        let invitation = TeamInvitation::new(
            ProjectId::generate(),
            UserId::generate(),
            UserId::generate(),
            Some("   ".to_string()),
            Duration::days(7),
        )
        .unwrap();

        assert!(invitation.message().is_none());
    }

    #[test]
    fn test_message_too_long() {
        let result = TeamInvitation::new(
            ProjectId::generate(),
            UserId::generate(),
            UserId::generate(),
            Some("m".repeat(501)),
            Duration::days(7),
        );

        assert_eq!(result.unwrap_err(), InvitationError::MessageTooLong(500));
    }

    #[test]
    fn test_accept_is_terminal() {
        let mut invitation = pending();

        invitation.respond(InvitationAction::Accept).unwrap();
        assert_eq!(invitation.status(), InvitationStatus::Accepted);
        assert!(invitation.responded_at().is_some());

        let err = invitation.respond(InvitationAction::Reject).unwrap_err();
        assert_eq!(
            err,
            InvitationError::AlreadyResponded(InvitationStatus::Accepted)
        );
        assert_eq!(invitation.status(), InvitationStatus::Accepted);
    }

    #[test]
    fn test_reject_is_terminal() {
        let mut invitation = pending();

        invitation.respond(InvitationAction::Reject).unwrap();
        assert_eq!(invitation.status(), InvitationStatus::Rejected);
        assert!(invitation.ensure_pending().is_err());
        assert!(invitation.respond(InvitationAction::Accept).is_err());
    }

    #[test]
    fn test_expiry_is_informational() {
        let mut invitation = pending();
        let later = invitation.expires_at() + Duration::seconds(1);

        assert!(invitation.is_past_expiry(later));
        // Past expiry but still answerable
        assert!(invitation.respond(InvitationAction::Accept).is_ok());
    }

    #[test]
    fn test_action_deserialization() {
        let action: InvitationAction = serde_json::from_str("\"accept\"").unwrap();
        assert_eq!(action, InvitationAction::Accept);
        assert!(serde_json::from_str::<InvitationAction>("\"maybe\"").is_err());
    }
}
