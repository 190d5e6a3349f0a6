//! Cart Model
//!
//! One cart document per user (record id keyed by email). Line items and
//! addresses live as embedded lists; a cart never holds two line items
//! for the same product id, and at most one address is selected.

use super::product::StockFlag;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Cart document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub user_email: String,
    #[serde(default)]
    pub product: Vec<CartItem>,
    #[serde(default)]
    pub address: Vec<CartAddress>,
}

impl Cart {
    pub fn new(user_email: impl Into<String>) -> Self {
        Self {
            id: None,
            user_email: user_email.into(),
            product: Vec::new(),
            address: Vec::new(),
        }
    }
}

/// One product line item inside a cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: i64,
    pub price: f64,
    #[serde(default)]
    pub price_fixed: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub discount_amount_fixed: f64,
    #[serde(default)]
    pub discount_amount_total: f64,
    #[serde(default)]
    pub price_total: f64,
    pub stock: StockFlag,
    #[serde(default)]
    pub available: i64,
    #[serde(rename = "modifiedAt", default)]
    pub modified_at: String,
}

/// Partial line-item update; only supplied fields are patched
#[derive(Debug, Clone, Deserialize)]
pub struct CartItemPatch {
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub price_fixed: Option<f64>,
    pub discount: Option<f64>,
    pub discount_amount_fixed: Option<f64>,
    pub discount_amount_total: Option<f64>,
    pub price_total: Option<f64>,
    pub stock: Option<StockFlag>,
    pub available: Option<i64>,
    #[serde(rename = "modifiedAt")]
    pub modified_at: Option<String>,
}

impl CartItemPatch {
    /// Apply the supplied fields onto an existing line item
    pub fn apply(&self, item: &mut CartItem) {
        if let Some(v) = self.quantity {
            item.quantity = v;
        }
        if let Some(v) = self.price {
            item.price = v;
        }
        if let Some(v) = self.price_fixed {
            item.price_fixed = v;
        }
        if let Some(v) = self.discount {
            item.discount = v;
        }
        if let Some(v) = self.discount_amount_fixed {
            item.discount_amount_fixed = v;
        }
        if let Some(v) = self.discount_amount_total {
            item.discount_amount_total = v;
        }
        if let Some(v) = self.price_total {
            item.price_total = v;
        }
        if let Some(v) = self.stock {
            item.stock = v;
        }
        if let Some(v) = self.available {
            item.available = v;
        }
        if let Some(v) = &self.modified_at {
            item.modified_at = v.clone();
        }
    }
}

/// Saved delivery address
///
/// `addressId` is caller-supplied. Any further fields of the client's
/// address form (name, phone, street, ...) pass through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartAddress {
    #[serde(rename = "addressId")]
    pub address_id: i64,
    #[serde(default)]
    pub select_address: bool,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}
