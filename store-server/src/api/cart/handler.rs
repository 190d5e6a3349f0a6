//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::carts::{CartAddOutcome, CartService};
use crate::core::ServerState;
use crate::db::models::{Cart, CartAddress, CartItem, CartItemPatch};
use crate::utils::{AppError, AppResponse, AppResult, message, ok_with_message};

fn service(state: &ServerState) -> CartService {
    CartService::new(state.db.clone(), state.locks.clone())
}

/// GET /cart/:email - 获取购物车 (顺带清理已下架的行项目)
pub async fn fetch(
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> AppResult<Json<Cart>> {
    let cart = service(&state)
        .fetch(&email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cart for {} not found", email)))?;
    Ok(Json(cart))
}

/// PUT /cart/:email - 加购 (同一商品只保留一条行项目)
pub async fn add_line_item(
    State(state): State<ServerState>,
    Path(email): Path<String>,
    Json(item): Json<CartItem>,
) -> AppResult<Json<AppResponse<Cart>>> {
    match service(&state).add_line_item(&email, item).await? {
        CartAddOutcome::Added(cart) => Ok(ok_with_message(
            cart,
            "Product successfully added to your cart",
        )),
        CartAddOutcome::AlreadyInCart => Ok(message("Product is already in your cart")),
        CartAddOutcome::OutOfStock => Ok(message("Product is out of stock")),
    }
}

/// PUT /cart/:email/items/:product_id - 更新行项目 (只改传入的字段)
pub async fn update_line_item(
    State(state): State<ServerState>,
    Path((email, product_id)): Path<(String, String)>,
    Json(patch): Json<CartItemPatch>,
) -> AppResult<Json<Cart>> {
    let cart = service(&state)
        .update_line_item(&email, &product_id, patch)
        .await?;
    Ok(Json(cart))
}

/// DELETE /cart/:email/items/:product_id - 移除行项目
pub async fn remove_line_item(
    State(state): State<ServerState>,
    Path((email, product_id)): Path<(String, String)>,
) -> AppResult<Json<AppResponse<Cart>>> {
    let cart = service(&state).remove_line_item(&email, &product_id).await?;
    Ok(ok_with_message(cart, "Removed successfully from cart"))
}

/// POST /cart/:email/address - 新增收货地址
pub async fn add_address(
    State(state): State<ServerState>,
    Path(email): Path<String>,
    Json(address): Json<CartAddress>,
) -> AppResult<Json<Cart>> {
    let cart = service(&state).add_address(&email, address).await?;
    Ok(Json(cart))
}

/// PUT /cart/:email/address - 按 addressId 替换地址
pub async fn update_address(
    State(state): State<ServerState>,
    Path(email): Path<String>,
    Json(address): Json<CartAddress>,
) -> AppResult<Json<Cart>> {
    let cart = service(&state).update_address(&email, address).await?;
    Ok(Json(cart))
}

/// Select-address body
#[derive(Debug, Deserialize)]
pub struct SelectAddressRequest {
    #[serde(rename = "addressId")]
    pub address_id: i64,
}

/// PUT /cart/:email/address/select - 选中收货地址 (至多一个选中)
pub async fn select_address(
    State(state): State<ServerState>,
    Path(email): Path<String>,
    Json(payload): Json<SelectAddressRequest>,
) -> AppResult<Json<Cart>> {
    let cart = service(&state)
        .select_address(&email, payload.address_id)
        .await?;
    Ok(Json(cart))
}

/// DELETE /cart/:email/address/:address_id - 删除地址
pub async fn remove_address(
    State(state): State<ServerState>,
    Path((email, address_id)): Path<(String, i64)>,
) -> AppResult<Json<Cart>> {
    let cart = service(&state).remove_address(&email, address_id).await?;
    Ok(Json(cart))
}
