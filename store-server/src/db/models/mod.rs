//! Database Models
//!
//! Typed documents for the embedded SurrealDB tables. The wire field
//! names are part of the client contract and must not change
//! (`modifiedAt`, `addressId`, `orderId` keep their original casing).

pub mod serde_helpers;

pub mod cart;
pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub use cart::{Cart, CartAddress, CartItem, CartItemPatch};
pub use order::{
    FlattenedOrder, OrderCreate, OrderDocument, OrderEntry, OrderStatus, TransitionPayload,
};
pub use product::{Product, ProductCreate, ProductUpdate, RatingBucket, RatingHistogram, StockFlag};
pub use review::{FlattenedReview, ReviewDocument, ReviewEntry};
pub use user::{User, UserRole};
