//! Authentication infrastructure module
//!
//! Bearer token issuing and validation.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService};
