//! Review API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{FlattenedReview, ReviewEntry};
use crate::reviews::{ReviewOutcome, ReviewService};
use crate::utils::{AppError, AppResponse, AppResult, message, ok_with_message};

fn service(state: &ServerState) -> ReviewService {
    ReviewService::new(state.db.clone(), state.locks.clone())
}

/// PUT /reviews/:email - 提交评论 (重复 rating_id 不计票)
pub async fn submit(
    State(state): State<ServerState>,
    Path(email): Path<String>,
    Json(entry): Json<ReviewEntry>,
) -> AppResult<Json<AppResponse<ReviewEntry>>> {
    entry
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    match service(&state).submit(&email, entry).await? {
        ReviewOutcome::Accepted(entry) => {
            Ok(ok_with_message(entry, "Review submitted successfully"))
        }
        ReviewOutcome::AlreadyReviewed => Ok(message("You have already reviewed this product")),
    }
}

/// Query params for review listing; exactly one of `user` / `product`
#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    pub user: Option<String>,
    pub product: Option<String>,
}

/// GET /reviews?user=... | ?product=... - 扁平化评论列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ReviewQuery>,
) -> AppResult<Json<Vec<FlattenedReview>>> {
    let service = service(&state);
    let reviews = match (query.user.as_deref(), query.product.as_deref()) {
        (Some(user), None) => service.reviews_by_user(user).await?,
        (None, Some(product)) => service.reviews_by_product(product).await?,
        _ => {
            return Err(AppError::validation(
                "Exactly one of 'user' or 'product' is required",
            ));
        }
    };
    Ok(Json(reviews))
}
