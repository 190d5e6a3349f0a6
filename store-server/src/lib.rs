//! Store Server - 电商后端 (购物车/订单/库存/评分一致性引擎)
//!
//! # 架构概述
//!
//! - **HTTP API** (`api`): RESTful API 接口
//! - **数据库** (`db`): 嵌入式 SurrealDB 文档存储 + 仓储层
//! - **购物车** (`carts`): 行项目与收货地址管理
//! - **订单引擎** (`orders`): 订单状态机，shipped 转移驱动库存扣减和佣金入账
//! - **评论聚合** (`reviews`): 每用户一票的评分直方图
//!
//! # 模块结构
//!
//! ```text
//! store-server/src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (models + repository)
//! ├── carts/         # 购物车业务逻辑
//! ├── orders/        # 订单生命周期引擎
//! ├── reviews/       # 评论与评分直方图
//! └── utils/         # 错误、日志、keyed mutex
//! ```

pub mod api;
pub mod carts;
pub mod core;
pub mod db;
pub mod orders;
pub mod reviews;
pub mod utils;

// Re-export 公共类型
pub use carts::{CartAddOutcome, CartService};
pub use core::{Config, Server, ServerState};
pub use orders::{OrderEngine, OrderError};
pub use reviews::{ReviewOutcome, ReviewService};
pub use utils::{AppError, AppResult, KeyedMutex};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置进程环境 (dotenv + 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
   _____ __
  / ___// /_____  ________
  \__ \/ __/ __ \/ ___/ _ \
 ___/ / /_/ /_/ / /  /  __/
/____/\__/\____/_/   \___/
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}
