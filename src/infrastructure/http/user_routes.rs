//! User mirror routes
//!
//! The account subsystem pushes user records here so membership operations
//! can resolve them.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::{UserDirectoryPort, UserLookupPort};
use crate::domain::entities::User;
use crate::infrastructure::http::parse_user_id;
use crate::infrastructure::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpsertUserRequest {
    pub username: String,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub is_public: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            is_public: user.is_public,
        }
    }
}

/// Insert or replace a user record
pub async fn upsert_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpsertUserRequest>,
) -> Result<Json<UserResponse>, (StatusCode, String)> {
    let id = parse_user_id(&id, "user")?;
    if req.username.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Username cannot be empty".to_string()));
    }

    let user = User::new(id, req.username.trim(), req.is_public);
    state
        .user_directory
        .upsert(&user)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    tracing::info!(user_id = %id, "Mirrored user record");
    Ok(Json(UserResponse::from(user)))
}

/// Get a user record
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, (StatusCode, String)> {
    let id = parse_user_id(&id, "user")?;

    let user = state
        .user_directory
        .get_by_id(id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}
