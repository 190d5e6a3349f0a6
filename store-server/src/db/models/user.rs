//! User Model
//!
//! Users double as commission-ledger rows: the single `owner` row and
//! one row per seller carry the `total_earn` floating accumulator.
//! `total_earn` only ever grows, and only from the shipped transition.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Admin,
    User,
}

/// User / ledger row (record id keyed by email)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub total_earn: f64,
}
