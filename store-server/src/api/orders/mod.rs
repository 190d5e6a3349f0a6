//! Order API 模块
//!
//! 状态转移挂在订单资源下 (`/orders/{email}/{order_id}/status/{status}`)，
//! 转移的佣金/库存载荷走请求体。

mod handler;

use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/orders", get(handler::list))
        .route(
            "/orders/{email}",
            get(handler::orders_for_user).post(handler::place_order),
        )
        .route("/orders/{email}/{order_id}", delete(handler::remove_order))
        .route("/orders/{email}/{order_id}/cancel", put(handler::cancel_order))
        .route(
            "/orders/{email}/{order_id}/status/{status}",
            put(handler::transition_status),
        )
}
