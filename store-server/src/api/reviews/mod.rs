//! Review API 模块

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/reviews", get(handler::list))
        .route("/reviews/{email}", put(handler::submit))
}
