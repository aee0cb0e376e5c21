//! Infrastructure layer - storage backends, services and adapters

pub mod auth;
pub mod invitation;
pub mod logging;
pub mod notification;
pub mod project;
pub mod storage;
pub mod user;
