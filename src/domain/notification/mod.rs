//! Notification domain
//!
//! Notifications are side-effect records written when invitation or team
//! state changes.

mod entity;
mod repository;

pub use entity::{Notification, NotificationId, NotificationKind};
pub use repository::NotificationRepository;

#[cfg(test)]
pub use repository::MockNotificationRepository;
