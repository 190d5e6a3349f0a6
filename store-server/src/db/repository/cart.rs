//! Cart Repository
//!
//! Whole-document list writes, mirroring the storage shape (one cart
//! document per user, embedded line-item and address lists). Callers
//! are expected to hold the `cart:{email}` critical section around any
//! read-modify-write sequence.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Cart, CartAddress, CartItem};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const CART_TABLE: &str = "cart";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the cart document for a user
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Cart>> {
        let cart: Option<Cart> = self.base.db().select((CART_TABLE, email)).await?;
        Ok(cart)
    }

    /// Replace the line-item list (creates the document when absent)
    pub async fn save_items(&self, email: &str, items: Vec<CartItem>) -> RepoResult<Cart> {
        let mut result = self
            .base
            .db()
            .query(
                "UPSERT type::thing('cart', $email) \
                 SET user_email = $email, product = $product RETURN AFTER",
            )
            .bind(("email", email.to_string()))
            .bind(("product", items))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        carts
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to write cart".to_string()))
    }

    /// Replace the address list (creates the document when absent)
    pub async fn save_addresses(&self, email: &str, addresses: Vec<CartAddress>) -> RepoResult<Cart> {
        let mut result = self
            .base
            .db()
            .query(
                "UPSERT type::thing('cart', $email) \
                 SET user_email = $email, address = $address RETURN AFTER",
            )
            .bind(("email", email.to_string()))
            .bind(("address", addresses))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        carts
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to write cart".to_string()))
    }
}
