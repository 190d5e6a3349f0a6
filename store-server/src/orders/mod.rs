//! Order Engine
//!
//! 订单生命周期状态机。转移表：
//!
//! ```text
//! placed   → placed | shipped | canceled
//! shipped  → shipped   (幂等空操作，副作用不会重复执行)
//! canceled → canceled  (幂等空操作)
//! 其余转移 → InvalidTransition
//! ```
//!
//! shipped 转移的三类副作用（订单状态、两条佣金账本、商品库存）必须
//! 全部成功或全部失败：整体打包成一条 SurrealDB 事务提交，账本累加用
//! 存储层的原子自增语义而不是读-改-写。

mod error;


pub use error::OrderError;

use crate::db::models::{
    FlattenedOrder, OrderCreate, OrderDocument, OrderEntry, OrderStatus, TransitionPayload,
};
use crate::db::repository::{OrderRepository, strip_table_prefix};
use crate::utils::KeyedMutex;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Bounded retry for the shipped transaction on storage conflicts
const SHIP_RETRY_ATTEMPTS: u32 = 3;

/// Ledger credit half of a shipped payload
struct LedgerCredit {
    owner_commission: f64,
    total_earn: f64,
    seller_email: String,
}

/// Inventory half of a shipped payload
struct InventoryDebit {
    product_key: String,
    quantity: i64,
}

pub struct OrderEngine {
    db: Surreal<Db>,
    repo: OrderRepository,
    locks: Arc<KeyedMutex>,
}

impl OrderEngine {
    pub fn new(db: Surreal<Db>, locks: Arc<KeyedMutex>) -> Self {
        Self {
            repo: OrderRepository::new(db.clone()),
            db,
            locks,
        }
    }

    fn lock_key(email: &str) -> String {
        format!("order:{email}")
    }

    /// Convert a cart snapshot into a persisted order entry
    ///
    /// The `orderId` comes from the caller (external contract). An empty
    /// snapshot is refused; a duplicate id within the user's list is a
    /// conflict, since every later operation addresses entries by id.
    pub async fn place_order(
        &self,
        email: &str,
        create: OrderCreate,
    ) -> Result<OrderEntry, OrderError> {
        if create.product.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let _guard = self.locks.lock(Self::lock_key(email)).await;

        let mut entries = self
            .repo
            .find_by_email(email)
            .await?
            .map(|doc| doc.orders)
            .unwrap_or_default();

        if entries.iter().any(|e| e.order_id == create.order_id) {
            return Err(OrderError::Duplicate(create.order_id));
        }

        let entry = create.into_entry(OrderStatus::Placed, now());
        entries.push(entry.clone());
        self.write_entries(email, &entries).await?;

        tracing::info!(user = %email, order_id = entry.order_id, "Order placed");
        Ok(entry)
    }

    /// Drive one order entry through the status machine
    pub async fn transition_status(
        &self,
        email: &str,
        order_id: i64,
        target: OrderStatus,
        payload: TransitionPayload,
    ) -> Result<OrderEntry, OrderError> {
        let _guard = self.locks.lock(Self::lock_key(email)).await;

        let mut entries = self
            .repo
            .find_by_email(email)
            .await?
            .map(|doc| doc.orders)
            .ok_or_else(|| OrderError::NotFound(format!("Orders for {} not found", email)))?;

        let index = entries
            .iter()
            .position(|e| e.order_id == order_id)
            .ok_or_else(|| OrderError::NotFound(format!("Order {} not found", order_id)))?;
        let current = entries[index].status;

        match (current, target) {
            // Re-applying a terminal status is a no-op: the side effects
            // of the first application must not run twice
            (OrderStatus::Shipped, OrderStatus::Shipped)
            | (OrderStatus::Canceled, OrderStatus::Canceled) => Ok(entries[index].clone()),

            (OrderStatus::Placed, OrderStatus::Placed) => {
                entries[index].status = OrderStatus::Placed;
                entries[index].time_placed = Some(now());
                self.write_entries(email, &entries).await?;
                Ok(entries[index].clone())
            }

            (OrderStatus::Placed, OrderStatus::Shipped) => {
                self.apply_shipped(email, entries, index, payload).await
            }

            (OrderStatus::Placed, OrderStatus::Canceled) => {
                entries[index].status = OrderStatus::Canceled;
                entries[index].cancel_reason = payload.cancel_reason;
                entries[index].time_canceled = Some(now());
                self.write_entries(email, &entries).await?;
                tracing::info!(user = %email, order_id, "Order canceled");
                Ok(entries[index].clone())
            }

            (from, to) => Err(OrderError::InvalidTransition { from, to }),
        }
    }

    /// Cancel an unshipped order (wrapper over the canceled transition)
    pub async fn cancel_order(
        &self,
        email: &str,
        order_id: i64,
        cancel_reason: Option<String>,
    ) -> Result<OrderEntry, OrderError> {
        let payload = TransitionPayload {
            cancel_reason,
            ..TransitionPayload::default()
        };
        self.transition_status(email, order_id, OrderStatus::Canceled, payload)
            .await
    }

    /// Admin hard delete: bypasses the state machine, reverses nothing
    pub async fn remove_order(&self, email: &str, order_id: i64) -> Result<(), OrderError> {
        let _guard = self.locks.lock(Self::lock_key(email)).await;

        let mut entries = self
            .repo
            .find_by_email(email)
            .await?
            .map(|doc| doc.orders)
            .ok_or_else(|| OrderError::NotFound(format!("Orders for {} not found", email)))?;

        let before = entries.len();
        entries.retain(|e| e.order_id != order_id);
        if entries.len() == before {
            return Err(OrderError::NotFound(format!("Order {} not found", order_id)));
        }

        self.write_entries(email, &entries).await?;
        tracing::info!(user = %email, order_id, "Order removed");
        Ok(())
    }

    /// The user's whole order document
    pub async fn orders_for_user(
        &self,
        email: &str,
    ) -> Result<Option<OrderDocument>, OrderError> {
        Ok(self.repo.find_by_email(email).await?)
    }

    /// Flatten every user's order list into individual records,
    /// optionally filtered by seller
    pub async fn list_by_seller(
        &self,
        seller: Option<&str>,
    ) -> Result<Vec<FlattenedOrder>, OrderError> {
        let docs = self.repo.find_all().await?;
        let mut flattened = Vec::new();
        for doc in docs {
            for entry in doc.orders {
                if seller.is_none_or(|s| entry.seller == s) {
                    flattened.push(FlattenedOrder {
                        user_email: doc.user_email.clone(),
                        orders: entry,
                    });
                }
            }
        }
        Ok(flattened)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Apply the shipped transition: order status, ledger credits and
    /// inventory decrement commit as one transaction or not at all
    async fn apply_shipped(
        &self,
        email: &str,
        mut entries: Vec<OrderEntry>,
        index: usize,
        payload: TransitionPayload,
    ) -> Result<OrderEntry, OrderError> {
        let ledger = match (payload.owner_commission, payload.total_earn) {
            (Some(owner_commission), Some(total_earn)) => Some(LedgerCredit {
                owner_commission,
                total_earn,
                seller_email: payload
                    .seller_email
                    .clone()
                    .unwrap_or_else(|| entries[index].seller.clone()),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(OrderError::MissingField("totalEarn")),
            (None, Some(_)) => return Err(OrderError::MissingField("ownerCommission")),
        };

        let inventory = match (&payload.product_id, payload.quantity) {
            (Some(product_id), Some(quantity)) if quantity >= 1 => Some(InventoryDebit {
                product_key: strip_table_prefix("product", product_id).to_string(),
                quantity,
            }),
            (Some(_), _) => return Err(OrderError::MissingField("quantity")),
            (None, _) => None,
        };

        // Lock ordering: the caller already holds order:{email}; the
        // product lock comes second, same as in the review service
        let _product_guard = match &inventory {
            Some(debit) => {
                let guard = self
                    .locks
                    .lock(format!("product:{}", debit.product_key))
                    .await;
                let exists: Option<crate::db::models::Product> = self
                    .db
                    .select(("product", debit.product_key.as_str()))
                    .await?;
                if exists.is_none() {
                    return Err(OrderError::NotFound(format!(
                        "Product {} not found",
                        debit.product_key
                    )));
                }
                Some(guard)
            }
            None => None,
        };

        entries[index].status = OrderStatus::Shipped;
        entries[index].time_shipped = Some(now());

        let mut statements = vec![
            "BEGIN TRANSACTION",
            "UPDATE type::thing('order', $email) SET orders = $orders",
        ];
        if ledger.is_some() {
            statements.push(
                "UPDATE user SET total_earn = (total_earn ?? 0) + $owner_commission \
                 WHERE role = 'owner'",
            );
            statements.push(
                "UPSERT type::thing('user', $seller_email) \
                 SET email = $seller_email, role = role ?? 'admin', \
                     total_earn = (total_earn ?? 0) + $total_earn",
            );
        }
        if inventory.is_some() {
            statements.push(
                "UPDATE type::thing('product', $product_key) \
                 SET available = math::max([available - $quantity, 0]), \
                     top_sell = (top_sell ?? 0) + $quantity",
            );
            statements.push(
                "UPDATE type::thing('product', $product_key) \
                 SET stock = (IF available >= 1 { 'in' } ELSE { 'out' })",
            );
        }
        statements.push("COMMIT TRANSACTION");
        let sql = statements.join(";\n");

        let mut last_err = None;
        for attempt in 1..=SHIP_RETRY_ATTEMPTS {
            let mut query = self
                .db
                .query(sql.as_str())
                .bind(("email", email.to_string()))
                .bind(("orders", entries.clone()));
            if let Some(credit) = &ledger {
                query = query
                    .bind(("owner_commission", credit.owner_commission))
                    .bind(("total_earn", credit.total_earn))
                    .bind(("seller_email", credit.seller_email.clone()));
            }
            if let Some(debit) = &inventory {
                query = query
                    .bind(("product_key", debit.product_key.clone()))
                    .bind(("quantity", debit.quantity));
            }

            match query.await.and_then(|response| response.check()) {
                Ok(_) => {
                    tracing::info!(user = %email, order_id = entries[index].order_id, "Order shipped");
                    return Ok(entries[index].clone());
                }
                Err(e) => {
                    tracing::warn!(
                        user = %email,
                        attempt,
                        error = %e,
                        "Shipped transition failed, retrying"
                    );
                    last_err = Some(e);
                }
            }
        }

        tracing::error!(
            user = %email,
            error = ?last_err,
            "Shipped transition gave up, no effect was committed"
        );
        Err(OrderError::Conflict(SHIP_RETRY_ATTEMPTS))
    }

    async fn write_entries(&self, email: &str, entries: &[OrderEntry]) -> Result<(), OrderError> {
        self.db
            .query(
                "UPSERT type::thing('order', $email) \
                 SET user_email = $email, orders = $orders",
            )
            .bind(("email", email.to_string()))
            .bind(("orders", entries.to_vec()))
            .await?
            .check()?;
        Ok(())
    }
}

/// Lifecycle timestamp (RFC 3339 UTC)
fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
