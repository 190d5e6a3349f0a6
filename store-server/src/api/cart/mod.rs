//! Cart API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/cart/{email}",
            get(handler::fetch).put(handler::add_line_item),
        )
        .route(
            "/cart/{email}/items/{product_id}",
            put(handler::update_line_item).delete(handler::remove_line_item),
        )
        .route(
            "/cart/{email}/address",
            post(handler::add_address).put(handler::update_address),
        )
        .route("/cart/{email}/address/select", put(handler::select_address))
        .route(
            "/cart/{email}/address/{address_id}",
            delete(handler::remove_address),
        )
}
