//! Order engine errors

use crate::db::models::OrderStatus;
use crate::db::repository::RepoError;
use crate::utils::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Order has no line items")]
    EmptyOrder,

    #[error("Order {0} already exists")]
    Duplicate(i64),

    #[error("No transition from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Missing transition field: {0}")]
    MissingField(&'static str),

    #[error("Storage conflict, gave up after {0} attempts")]
    Conflict(u32),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for OrderError {
    fn from(err: surrealdb::Error) -> Self {
        OrderError::Database(err.to_string())
    }
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => OrderError::NotFound(msg),
            RepoError::Duplicate(msg)
            | RepoError::Database(msg)
            | RepoError::Validation(msg) => OrderError::Database(msg),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(msg) => AppError::NotFound(msg),
            OrderError::EmptyOrder => {
                AppError::BusinessRule("Order has no line items".to_string())
            }
            OrderError::Duplicate(id) => {
                AppError::Conflict(format!("Order {} already exists", id))
            }
            err @ OrderError::InvalidTransition { .. } => AppError::BusinessRule(err.to_string()),
            err @ OrderError::MissingField(_) => AppError::Validation(err.to_string()),
            err @ OrderError::Conflict(_) => AppError::Conflict(err.to_string()),
            OrderError::Database(msg) => AppError::Database(msg),
        }
    }
}
