//! Order Model
//!
//! One order document per user (record id keyed by email) holding the
//! ordered list of order entries. Entries are addressed by the
//! caller-supplied `orderId` (an external contract, the engine never
//! generates order ids).

use super::cart::{CartAddress, CartItem};
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use std::fmt;
use surrealdb::RecordId;
use validator::Validate;

/// Order lifecycle status
///
/// `Shipped` and `Canceled` are terminal; the transition table lives in
/// the order engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Placed,
    Shipped,
    Canceled,
}

impl OrderStatus {
    /// Parse a wire status string ("placed" | "shipped" | "canceled")
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "placed" => Some(OrderStatus::Placed),
            "shipped" => Some(OrderStatus::Shipped),
            "canceled" => Some(OrderStatus::Canceled),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Canceled => "canceled",
        };
        f.write_str(s)
    }
}

/// Order document: all of one user's orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDocument {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub user_email: String,
    #[serde(default)]
    pub orders: Vec<OrderEntry>,
}

/// One order inside a user's order document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEntry {
    #[serde(rename = "orderId")]
    pub order_id: i64,
    pub seller: String,
    pub status: OrderStatus,
    /// Cart snapshot taken at checkout
    #[serde(default)]
    pub product: Vec<CartItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<CartAddress>,
    #[serde(default)]
    pub price_total: f64,
    #[serde(default)]
    pub discount_amount_total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_placed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_shipped: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_canceled: Option<String>,
}

/// Checkout payload: a cart snapshot to turn into an order entry
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderCreate {
    #[serde(rename = "orderId")]
    pub order_id: i64,
    #[validate(email)]
    pub seller: String,
    #[serde(default)]
    pub product: Vec<CartItem>,
    pub address: Option<CartAddress>,
    #[serde(default)]
    pub price_total: f64,
    #[serde(default)]
    pub discount_amount_total: f64,
}

impl OrderCreate {
    /// Build the persisted entry; the engine stamps status and times
    pub fn into_entry(self, status: OrderStatus, time_placed: String) -> OrderEntry {
        OrderEntry {
            order_id: self.order_id,
            seller: self.seller,
            status,
            product: self.product,
            address: self.address,
            price_total: self.price_total,
            discount_amount_total: self.discount_amount_total,
            cancel_reason: None,
            time_placed: Some(time_placed),
            time_shipped: None,
            time_canceled: None,
        }
    }
}

/// Status-transition body
///
/// Commission fields travel as a group (`ownerCommission` + `totalEarn`,
/// ledger row keyed by `seller_email`), inventory fields as another
/// (`productId` + `quantity`). Either group may be absent.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TransitionPayload {
    #[serde(rename = "ownerCommission")]
    pub owner_commission: Option<f64>,
    #[serde(rename = "totalEarn")]
    pub total_earn: Option<f64>,
    #[validate(email)]
    pub seller_email: Option<String>,
    #[serde(rename = "productId")]
    pub product_id: Option<String>,
    #[validate(range(min = 1))]
    pub quantity: Option<i64>,
    pub cancel_reason: Option<String>,
}

/// One order entry flattened out of its user document
///
/// Mirrors the unwound per-entry shape of the seller/admin order views:
/// `{user_email, orders: <entry>}`.
#[derive(Debug, Clone, Serialize)]
pub struct FlattenedOrder {
    pub user_email: String,
    pub orders: OrderEntry,
}
