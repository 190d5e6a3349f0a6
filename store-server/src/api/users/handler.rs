//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::User;
use crate::db::repository::UserRepository;
use crate::utils::AppResult;

/// PUT /users/:email - 确保用户行存在 (已有行保留角色和账本)
pub async fn ensure(
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> AppResult<Json<User>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo.ensure(&email).await?;
    Ok(Json(user))
}
