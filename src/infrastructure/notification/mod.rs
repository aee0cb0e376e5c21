//! Notification infrastructure

mod in_memory;
mod postgres;
mod service;

pub use in_memory::InMemoryNotificationRepository;
pub(crate) use postgres::insert_notification;
pub use postgres::PostgresNotificationRepository;
pub use service::{NotificationService, NotificationServiceTrait};
