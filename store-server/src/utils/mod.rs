//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResponse`] - 应用错误类型和 API 响应结构
//! - [`KeyedMutex`] - 按 key 的异步互斥锁
//! - 日志等工具

pub mod error;
pub mod keylock;
pub mod logger;
pub mod result;

pub use error::{AppError, AppResponse};
pub use error::{message, ok, ok_with_message};
pub use keylock::KeyedMutex;
pub use result::AppResult;
