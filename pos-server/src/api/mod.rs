//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`menu`] - 顾客菜单 (在售且有库存的商品)
//! - [`products`] - 商品管理接口
//! - [`employees`] - 员工账户管理接口
//! - [`discounts`] - 折扣码管理接口
//! - [`orders`] - 订单读取接口 (员工看板重新拉取用)
//! - [`reports`] - 营收报表接口
//!
//! 认证/会话属于外部协作方：处理器信任显式传入的身份，不携带令牌栈。

pub mod discounts;
pub mod employees;
pub mod health;
pub mod menu;
pub mod orders;
pub mod products;
pub mod reports;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble all API routers
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(menu::router())
        .merge(products::router())
        .merge(employees::router())
        .merge(discounts::router())
        .merge(orders::router())
        .merge(reports::router())
}
