//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{
    FlattenedOrder, OrderCreate, OrderDocument, OrderEntry, OrderStatus, TransitionPayload,
};
use crate::orders::OrderEngine;
use crate::utils::{AppError, AppResponse, AppResult, message, ok_with_message};

fn engine(state: &ServerState) -> OrderEngine {
    OrderEngine::new(state.db.clone(), state.locks.clone())
}

/// Query params for the flattened order list
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub seller: Option<String>,
}

/// GET /orders?seller=... - 扁平化订单列表 (卖家/管理视图)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<FlattenedOrder>>> {
    let orders = engine(&state).list_by_seller(query.seller.as_deref()).await?;
    Ok(Json(orders))
}

/// GET /orders/:email - 用户订单文档
pub async fn orders_for_user(
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> AppResult<Json<OrderDocument>> {
    let doc = engine(&state)
        .orders_for_user(&email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Orders for {} not found", email)))?;
    Ok(Json(doc))
}

/// POST /orders/:email - 结账：购物车快照落为订单
pub async fn place_order(
    State(state): State<ServerState>,
    Path(email): Path<String>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<AppResponse<OrderEntry>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let entry = engine(&state).place_order(&email, payload).await?;
    Ok(ok_with_message(entry, "Order placed successfully"))
}

/// PUT /orders/:email/:order_id/status/:status - 订单状态转移
pub async fn transition_status(
    State(state): State<ServerState>,
    Path((email, order_id, status)): Path<(String, i64, String)>,
    Json(payload): Json<TransitionPayload>,
) -> AppResult<Json<OrderEntry>> {
    let target = OrderStatus::parse(&status)
        .ok_or_else(|| AppError::validation(format!("Unknown order status: {}", status)))?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let entry = engine(&state)
        .transition_status(&email, order_id, target, payload)
        .await?;
    Ok(Json(entry))
}

/// Cancel-order body
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub cancel_reason: Option<String>,
}

/// PUT /orders/:email/:order_id/cancel - 取消未发货订单
pub async fn cancel_order(
    State(state): State<ServerState>,
    Path((email, order_id)): Path<(String, i64)>,
    Json(payload): Json<CancelRequest>,
) -> AppResult<Json<AppResponse<OrderEntry>>> {
    let entry = engine(&state)
        .cancel_order(&email, order_id, payload.cancel_reason)
        .await?;
    Ok(ok_with_message(entry, "Order canceled successfully"))
}

/// DELETE /orders/:email/:order_id - 管理员硬删除 (绕过状态机)
pub async fn remove_order(
    State(state): State<ServerState>,
    Path((email, order_id)): Path<(String, i64)>,
) -> AppResult<Json<AppResponse<()>>> {
    engine(&state).remove_order(&email, order_id).await?;
    Ok(message("Order removed successfully"))
}
