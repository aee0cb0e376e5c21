//! Current-user endpoint

use super::dto::UserResponse;
use crate::api::middleware::RequireUser;
use crate::api::types::Json;

/// GET /users/me
pub async fn get_me(RequireUser(user): RequireUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
