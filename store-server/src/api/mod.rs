//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查接口
//! - [`products`] - 商品管理接口
//! - [`cart`] - 购物车接口 (行项目 + 收货地址)
//! - [`orders`] - 订单生命周期接口
//! - [`reviews`] - 评论与评分接口
//! - [`users`] - 用户接口

pub mod health;

pub mod cart;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
