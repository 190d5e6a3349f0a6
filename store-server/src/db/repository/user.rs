//! User Repository
//!
//! Users double as commission-ledger rows. The credit statements
//! themselves are part of the order engine's shipped transaction; this
//! repository covers row upkeep and ledger reads.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::User;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Ensure a user row exists; an existing row keeps its role and
    /// earnings untouched
    pub async fn ensure(&self, email: &str) -> RepoResult<User> {
        let mut result = self
            .base
            .db()
            .query(
                "UPSERT type::thing('user', $email) \
                 SET email = $email, role = role ?? 'user', \
                     total_earn = total_earn ?? 0 RETURN AFTER",
            )
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to write user".to_string()))
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.db().select((USER_TABLE, email)).await?;
        Ok(user)
    }

    /// Find the platform owner row
    pub async fn find_owner(&self) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE role = 'owner' LIMIT 1")
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Current owner ledger total (0 when no owner row exists)
    pub async fn owner_total(&self) -> RepoResult<f64> {
        Ok(self.find_owner().await?.map(|u| u.total_earn).unwrap_or(0.0))
    }

    /// Current ledger total for a seller (0 when the row is absent)
    pub async fn total_earned(&self, email: &str) -> RepoResult<f64> {
        Ok(self
            .find_by_email(email)
            .await?
            .map(|u| u.total_earn)
            .unwrap_or(0.0))
    }
}
