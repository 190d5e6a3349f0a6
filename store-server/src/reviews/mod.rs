//! Review Service
//!
//! 评论提交与商品评分直方图聚合。一个用户对同一 `rating_id` 只记一票；
//! 评论条目和直方图增量在同一条事务里提交，保证五个桶的计数之和永远
//! 等于已接受的评论数。

#[cfg(test)]
mod tests;

use crate::db::models::{FlattenedReview, Product, ReviewEntry};
use crate::db::repository::{RepoError, RepoResult, ReviewRepository, strip_table_prefix};
use crate::utils::KeyedMutex;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Outcome of a review submission
///
/// `AlreadyReviewed` is an informational signal, not a failure.
#[derive(Debug)]
pub enum ReviewOutcome {
    Accepted(ReviewEntry),
    AlreadyReviewed,
}

pub struct ReviewService {
    db: Surreal<Db>,
    repo: ReviewRepository,
    locks: Arc<KeyedMutex>,
}

impl ReviewService {
    pub fn new(db: Surreal<Db>, locks: Arc<KeyedMutex>) -> Self {
        Self {
            repo: ReviewRepository::new(db.clone()),
            db,
            locks,
        }
    }

    /// Record a review and fold its vote into the product histogram
    ///
    /// The histogram bucket is addressed by weight value, never by its
    /// position in the stored list.
    pub async fn submit(&self, email: &str, entry: ReviewEntry) -> RepoResult<ReviewOutcome> {
        if !(1..=5).contains(&entry.rating_point) {
            return Err(RepoError::Validation(
                "rating_point must be between 1 and 5".into(),
            ));
        }

        let _user_guard = self.locks.lock(format!("review:{email}")).await;

        let mut ratings = match self.repo.find_by_email(email).await? {
            Some(doc) => {
                if doc.rating.iter().any(|r| r.rating_id == entry.rating_id) {
                    return Ok(ReviewOutcome::AlreadyReviewed);
                }
                doc.rating
            }
            None => Vec::new(),
        };

        let product_key = strip_table_prefix("product", &entry.product_id).to_string();
        let _product_guard = self.locks.lock(format!("product:{product_key}")).await;

        let product: Option<Product> = self.db.select(("product", product_key.as_str())).await?;
        let product = product.ok_or_else(|| {
            RepoError::NotFound(format!("Product {} not found", entry.product_id))
        })?;

        let mut histogram = product.rating;
        histogram.add_vote(entry.rating_point);

        ratings.push(entry.clone());

        // Review entry and histogram commit together or not at all
        self.db
            .query(
                "BEGIN TRANSACTION;
                 UPSERT type::thing('review', $email) \
                     SET user_email = $email, rating = $rating;
                 UPDATE type::thing('product', $product_key) SET rating = $histogram;
                 COMMIT TRANSACTION;",
            )
            .bind(("email", email.to_string()))
            .bind(("rating", ratings))
            .bind(("product_key", product_key))
            .bind(("histogram", histogram))
            .await?
            .check()?;

        tracing::info!(user = %email, product = %entry.product_id, point = entry.rating_point, "Review accepted");
        Ok(ReviewOutcome::Accepted(entry))
    }

    /// Flatten one user's review list into individual records
    pub async fn reviews_by_user(&self, email: &str) -> RepoResult<Vec<FlattenedReview>> {
        let Some(doc) = self.repo.find_by_email(email).await? else {
            return Ok(Vec::new());
        };
        Ok(doc
            .rating
            .into_iter()
            .map(|entry| FlattenedReview {
                user_email: doc.user_email.clone(),
                rating: entry,
            })
            .collect())
    }

    /// Flatten every user's review list, filtered to one product
    pub async fn reviews_by_product(&self, product_id: &str) -> RepoResult<Vec<FlattenedReview>> {
        let docs = self.repo.find_all().await?;
        let mut flattened = Vec::new();
        for doc in docs {
            for entry in doc.rating {
                if entry.product_id == product_id {
                    flattened.push(FlattenedReview {
                        user_email: doc.user_email.clone(),
                        rating: entry,
                    });
                }
            }
        }
        Ok(flattened)
    }
}
