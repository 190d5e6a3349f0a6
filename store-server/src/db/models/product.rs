//! Product Model
//!
//! The `stock` flag is derived data: `"in"` iff `available >= 1`. It is
//! recomputed on every mutation of `available` and never accepted from a
//! client as-is.

use super::serde_helpers;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use surrealdb::RecordId;
use validator::Validate;

/// Derived in/out stock indicator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StockFlag {
    In,
    Out,
}

impl StockFlag {
    /// Derive the flag from a unit count
    pub fn from_available(available: i64) -> Self {
        if available >= 1 {
            StockFlag::In
        } else {
            StockFlag::Out
        }
    }
}

/// One bucket of the star-rating histogram
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RatingBucket {
    pub weight: u8,
    pub count: u32,
}

/// Five-bucket star-rating histogram
///
/// Stored and serialized as a weight-descending list of buckets
/// (`[{weight:5,..}, {weight:4,..}, ... {weight:1,..}]`), but always
/// addressed by weight value in code. A bucket's position in the stored
/// list carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingHistogram {
    /// counts[w - 1] holds the count for weight w
    counts: [u32; 5],
}

impl RatingHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one vote for `point`. Returns false for an out-of-range point.
    pub fn add_vote(&mut self, point: u8) -> bool {
        if !(1..=5).contains(&point) {
            return false;
        }
        self.counts[usize::from(point - 1)] += 1;
        true
    }

    /// Count for a single weight (0 for out-of-range weights)
    pub fn count_for(&self, weight: u8) -> u32 {
        if (1..=5).contains(&weight) {
            self.counts[usize::from(weight - 1)]
        } else {
            0
        }
    }

    /// Total number of recorded votes
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| u64::from(*c)).sum()
    }
}

impl Serialize for RatingHistogram {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let buckets: Vec<RatingBucket> = (1..=5u8)
            .rev()
            .map(|weight| RatingBucket {
                weight,
                count: self.count_for(weight),
            })
            .collect();
        buckets.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RatingHistogram {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Buckets are matched by weight value, never by position
        let buckets = Vec::<RatingBucket>::deserialize(deserializer)?;
        let mut histogram = Self::default();
        for bucket in buckets {
            if (1..=5).contains(&bucket.weight) {
                histogram.counts[usize::from(bucket.weight - 1)] = bucket.count;
            }
        }
        Ok(histogram)
    }
}

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    /// Owning seller's email
    pub seller: String,
    #[serde(default)]
    pub available: i64,
    pub stock: StockFlag,
    /// Units sold, accrued on every shipped order
    #[serde(default)]
    pub top_sell: i64,
    #[serde(default)]
    pub rating: RatingHistogram,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductCreate {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    #[validate(email)]
    pub seller: String,
    #[validate(range(min = 0))]
    pub available: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    #[validate(range(min = 0))]
    pub available: Option<i64>,
}
