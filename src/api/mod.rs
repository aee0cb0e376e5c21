//! HTTP API layer

pub mod admin;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod teams;
pub mod types;

pub use router::create_router_with_state;
pub use state::AppState;
