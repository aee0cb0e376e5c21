//! Admin API endpoints

pub mod users;

use axum::{routing::post, Router};

use super::state::AppState;

/// Create the admin router
pub fn create_admin_router() -> Router<AppState> {
    Router::new().route("/users", post(users::create_user))
}
