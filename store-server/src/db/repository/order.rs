//! Order Repository
//!
//! Read-only access to order documents. All order mutations go through
//! the order engine, which owns the status machine and its side
//! effects.

use super::{BaseRepository, RepoResult};
use crate::db::models::OrderDocument;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the order document for a user
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<OrderDocument>> {
        let doc: Option<OrderDocument> = self.base.db().select((ORDER_TABLE, email)).await?;
        Ok(doc)
    }

    /// Find every user's order document
    pub async fn find_all(&self) -> RepoResult<Vec<OrderDocument>> {
        let docs: Vec<OrderDocument> = self
            .base
            .db()
            .query("SELECT * FROM order")
            .await?
            .take(0)?;
        Ok(docs)
    }
}
