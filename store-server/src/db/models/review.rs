//! Review Model
//!
//! One review document per user; individual reviews live in the embedded
//! `rating` list. A user never holds two entries with the same
//! `rating_id`; enforced at submission time.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Review document: all of one user's reviews
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDocument {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub user_email: String,
    #[serde(default)]
    pub rating: Vec<ReviewEntry>,
}

/// One submitted review
///
/// Extra client fields (review text, display name, ...) pass through
/// untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewEntry {
    pub rating_id: String,
    pub product_id: String,
    #[validate(range(min = 1, max = 5))]
    pub rating_point: u8,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// One review entry flattened out of its user document
#[derive(Debug, Clone, Serialize)]
pub struct FlattenedReview {
    pub user_email: String,
    pub rating: ReviewEntry,
}
