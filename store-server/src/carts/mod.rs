//! Cart Service
//!
//! 购物车业务逻辑：行项目的合并/更新/移除、地址管理、失效商品清理。
//! 每个序列都在 `cart:{email}` 临界区内执行：购物车文档的列表写入
//! 是整体替换，没有锁的话两个并发请求会互相覆盖。

use crate::db::models::{Cart, CartAddress, CartItem, CartItemPatch, StockFlag};
use crate::db::repository::{CartRepository, RepoError, RepoResult};
use crate::utils::KeyedMutex;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Outcome of an add-to-cart request
///
/// `AlreadyInCart` and `OutOfStock` are informational signals, not
/// failures; the handler answers 200 with a message.
#[derive(Debug)]
pub enum CartAddOutcome {
    Added(Cart),
    AlreadyInCart,
    OutOfStock,
}

pub struct CartService {
    repo: CartRepository,
    locks: Arc<KeyedMutex>,
}

impl CartService {
    pub fn new(db: Surreal<Db>, locks: Arc<KeyedMutex>) -> Self {
        Self {
            repo: CartRepository::new(db),
            locks,
        }
    }

    fn lock_key(email: &str) -> String {
        format!("cart:{email}")
    }

    /// Add a line item to the user's cart
    ///
    /// Out-of-stock items are refused up front; a line item for the same
    /// product id must not appear twice, so a duplicate add reports
    /// `AlreadyInCart` without touching the document.
    pub async fn add_line_item(&self, email: &str, item: CartItem) -> RepoResult<CartAddOutcome> {
        if item.stock != StockFlag::In || item.available <= 0 {
            return Ok(CartAddOutcome::OutOfStock);
        }

        let _guard = self.locks.lock(Self::lock_key(email)).await;

        let mut items = match self.repo.find_by_email(email).await? {
            Some(cart) => {
                if cart
                    .product
                    .iter()
                    .any(|line| line.product_id == item.product_id)
                {
                    return Ok(CartAddOutcome::AlreadyInCart);
                }
                cart.product
            }
            None => Vec::new(),
        };
        items.push(item);

        let cart = self.repo.save_items(email, items).await?;
        Ok(CartAddOutcome::Added(cart))
    }

    /// Patch the supplied fields of one line item (positional update)
    pub async fn update_line_item(
        &self,
        email: &str,
        product_id: &str,
        patch: CartItemPatch,
    ) -> RepoResult<Cart> {
        let _guard = self.locks.lock(Self::lock_key(email)).await;

        let mut cart = self.require_cart(email).await?;
        let item = cart
            .product
            .iter_mut()
            .find(|line| line.product_id == product_id)
            .ok_or_else(|| {
                RepoError::NotFound(format!("Product {} not in cart of {}", product_id, email))
            })?;
        patch.apply(item);

        self.repo.save_items(email, cart.product).await
    }

    /// Pull one line item out of the cart by product id
    pub async fn remove_line_item(&self, email: &str, product_id: &str) -> RepoResult<Cart> {
        let _guard = self.locks.lock(Self::lock_key(email)).await;

        let mut cart = self.require_cart(email).await?;
        cart.product.retain(|line| line.product_id != product_id);

        self.repo.save_items(email, cart.product).await
    }

    /// Append a saved address (creates the cart document when absent)
    pub async fn add_address(&self, email: &str, address: CartAddress) -> RepoResult<Cart> {
        let _guard = self.locks.lock(Self::lock_key(email)).await;

        let mut addresses = self
            .repo
            .find_by_email(email)
            .await?
            .map(|cart| cart.address)
            .unwrap_or_default();
        addresses.push(address);

        self.repo.save_addresses(email, addresses).await
    }

    /// Replace the address matching the payload's `addressId`
    pub async fn update_address(&self, email: &str, address: CartAddress) -> RepoResult<Cart> {
        let _guard = self.locks.lock(Self::lock_key(email)).await;

        let mut cart = self.require_cart(email).await?;
        let slot = cart
            .address
            .iter_mut()
            .find(|a| a.address_id == address.address_id)
            .ok_or_else(|| {
                RepoError::NotFound(format!("Address {} not in cart of {}", address.address_id, email))
            })?;
        *slot = address;

        self.repo.save_addresses(email, cart.address).await
    }

    /// Mark one address as the active delivery target
    ///
    /// Two ordered steps: clear every other address's flag first, then
    /// set the target. The set step never runs when the clearing write
    /// fails, so the document can never end up with two selections.
    pub async fn select_address(&self, email: &str, address_id: i64) -> RepoResult<Cart> {
        let _guard = self.locks.lock(Self::lock_key(email)).await;

        let cart = self.require_cart(email).await?;
        if !cart.address.iter().any(|a| a.address_id == address_id) {
            return Err(RepoError::NotFound(format!(
                "Address {} not in cart of {}",
                address_id, email
            )));
        }

        // Step 1: clear all other selections
        let mut addresses = cart.address;
        for address in addresses.iter_mut() {
            if address.address_id != address_id {
                address.select_address = false;
            }
        }
        self.repo.save_addresses(email, addresses.clone()).await?;

        // Step 2: set the target
        for address in addresses.iter_mut() {
            if address.address_id == address_id {
                address.select_address = true;
            }
        }
        self.repo.save_addresses(email, addresses).await
    }

    /// Pull one address by id
    pub async fn remove_address(&self, email: &str, address_id: i64) -> RepoResult<Cart> {
        let _guard = self.locks.lock(Self::lock_key(email)).await;

        let mut cart = self.require_cart(email).await?;
        cart.address.retain(|a| a.address_id != address_id);

        self.repo.save_addresses(email, cart.address).await
    }

    /// Fetch the cart, lazily sweeping out-of-stock line items
    pub async fn fetch(&self, email: &str) -> RepoResult<Option<Cart>> {
        let _guard = self.locks.lock(Self::lock_key(email)).await;

        let Some(cart) = self.repo.find_by_email(email).await? else {
            return Ok(None);
        };

        if cart.product.iter().any(|line| line.stock == StockFlag::Out) {
            let kept: Vec<CartItem> = cart
                .product
                .into_iter()
                .filter(|line| line.stock == StockFlag::In)
                .collect();
            let swept = self.repo.save_items(email, kept).await?;
            return Ok(Some(swept));
        }

        Ok(Some(cart))
    }

    async fn require_cart(&self, email: &str) -> RepoResult<Cart> {
        self.repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Cart for {} not found", email)))
    }
}
