//! Notification entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::id::uuid_id;
use crate::domain::user::UserId;

uuid_id!(
    /// Notification identifier
    NotificationId,
    "notification"
);

/// Type tag of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A student was invited to a team
    TeamInvitation,
    /// The invitee accepted; sent to the inviter
    InvitationAccepted,
    /// The invitee rejected; sent to the inviter
    InvitationRejected,
    /// A member was removed from a team by its owner
    MemberRemoved,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TeamInvitation => "team_invitation",
            Self::InvitationAccepted => "invitation_accepted",
            Self::InvitationRejected => "invitation_rejected",
            Self::MemberRemoved => "member_removed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "team_invitation" => Some(Self::TeamInvitation),
            "invitation_accepted" => Some(Self::InvitationAccepted),
            "invitation_rejected" => Some(Self::InvitationRejected),
            "member_removed" => Some(Self::MemberRemoved),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message addressed to one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    user_id: UserId,
    kind: NotificationKind,
    title: String,
    message: String,
    /// Deep link into the web app
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<String>,
    read: bool,
    created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::generate(),
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
            link: None,
            read: false,
            created_at: Utc::now(),
        }
    }

    /// Rebuild a notification from persisted fields
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: NotificationId,
        user_id: UserId,
        kind: NotificationKind,
        title: String,
        message: String,
        link: Option<String>,
        read: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            kind,
            title,
            message,
            link,
            read,
            created_at,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn is_read(&self) -> bool {
        self.read
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification_is_unread() {
        let user = UserId::generate();
        let notification = Notification::new(
            user,
            NotificationKind::TeamInvitation,
            "Team invitation",
            "You were invited",
        )
        .with_link("/invitations");

        assert_eq!(notification.user_id(), &user);
        assert!(!notification.is_read());
        assert_eq!(notification.link(), Some("/invitations"));
    }

    #[test]
    fn test_mark_read() {
        let mut notification = Notification::new(
            UserId::generate(),
            NotificationKind::InvitationAccepted,
            "Accepted",
            "Sari joined your team",
        );

        notification.mark_read();
        assert!(notification.is_read());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(
            serde_json::to_value(NotificationKind::InvitationRejected).unwrap(),
            "invitation_rejected"
        );
        assert_eq!(
            NotificationKind::parse("member_removed"),
            Some(NotificationKind::MemberRemoved)
        );
    }
}
