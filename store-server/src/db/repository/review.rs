//! Review Repository
//!
//! Read-only access to review documents; submissions go through the
//! review service so the histogram update commits with the entry.

use super::{BaseRepository, RepoResult};
use crate::db::models::ReviewDocument;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const REVIEW_TABLE: &str = "review";

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the review document for a user
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<ReviewDocument>> {
        let doc: Option<ReviewDocument> = self.base.db().select((REVIEW_TABLE, email)).await?;
        Ok(doc)
    }

    /// Find every user's review document
    pub async fn find_all(&self) -> RepoResult<Vec<ReviewDocument>> {
        let docs: Vec<ReviewDocument> = self
            .base
            .db()
            .query("SELECT * FROM review")
            .await?
            .take(0)?;
        Ok(docs)
    }
}
