//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResponse`] - 应用错误类型和 API 响应结构
//! - [`logger`] - 日志初始化
//! - [`password`] - 员工口令哈希
//! - [`time`] - 业务时区换算

pub mod error;
pub mod logger;
pub mod password;
pub mod time;

pub use error::{AppError, AppResponse, AppResult, ok, ok_with_message};
