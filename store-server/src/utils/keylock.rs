//! 按 key 的异步互斥锁
//!
//! 文档存储没有跨操作的事务范围，所以每个"读-改-写"序列必须在
//! 对应文档 key 的临界区内执行。锁表用 DashMap 实现无锁并发访问，
//! 每个 key 懒创建一把 `tokio::sync::Mutex`。
//!
//! # Key 约定
//!
//! | key | 保护的文档 |
//! |-----|-----------|
//! | `cart:{email}` | 用户购物车 |
//! | `order:{email}` | 用户订单列表 |
//! | `review:{email}` | 用户评论列表 |
//! | `product:{id}` | 商品 (库存/评分直方图) |
//!
//! 获取多把锁时必须先取用户级锁、再取商品级锁，避免死锁。

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed mutual-exclusion table
///
/// Guards are released on drop. Entries are never removed; the set of
/// live keys is bounded by the set of users and products.
#[derive(Debug, Default)]
pub struct KeyedMutex {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedMutex {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the lock for `key`, waiting if another task holds it
    pub async fn lock(&self, key: impl Into<String>) -> OwnedMutexGuard<()> {
        let cell = self.locks.entry(key.into()).or_default().clone();
        cell.lock_owned().await
    }
}
