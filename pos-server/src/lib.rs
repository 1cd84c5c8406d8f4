//! Robusta POS Server - 咖啡馆点单/收银协调服务
//!
//! # 架构概述
//!
//! 本模块是 POS Server 的主入口，提供以下核心功能：
//!
//! - **订单协调器** (`orders`): Pending → Paying → Completed 状态机，
//!   含库存原子扣减与幂等出单
//! - **消息总线** (`message`): 主题化实时通知扇出
//! - **数据库** (`db`): SQLite (sqlx) 存储与迁移
//! - **HTTP API** (`api`): 菜单/管理/报表接口
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层
//! ├── message/       # 消息总线
//! ├── orders/        # 订单协调器
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod message;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use message::{MessageBus, MessageHandler};
pub use orders::{CoordinatorError, OrderCoordinator};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____        __               __
   / __ \____  / /_  __  _______/ /_____ _
  / /_/ / __ \/ __ \/ / / / ___/ __/ __ `/
 / _, _/ /_/ / /_/ / /_/ (__  ) /_/ /_/ /
/_/ |_|\____/_.___/\__,_/____/\__/\__,_/
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/
    "#
    );
}
