//! User API 模块

mod handler;

use axum::{Router, routing::put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/users/{email}", put(handler::ensure))
}
