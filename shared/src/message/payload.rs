use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== Notification Level ====================

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// 普通信息
    Info,
    /// 警告
    Warning,
    /// 错误
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

// ==================== Payloads ====================

/// 通知载荷 (服务端 -> 客户端)
///
/// 用于向用户展示系统状态、错误或业务提示。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// 标题
    pub title: String,
    /// 消息内容
    pub message: String,
    /// 通知级别
    pub level: NotificationLevel,
}

/// 请求指令载荷 (客户端 -> 服务端)
///
/// 表示客户端发起的业务操作请求。身份随请求显式携带，会话 ID 由
/// 传输层写入 [`super::BusMessage::source`]。
///
/// # 动作
/// - `check_discount_code`: `{code}`
/// - `new_order_request`: `{discount_percent, cart: [{id, qty, options}]}`
/// - `staff_request_payment`: `{order_id}`
/// - `staff_confirm_payment`: `{order_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestCommandPayload {
    /// 操作标识
    pub action: String,
    /// 操作参数 (可选的 JSON 对象)
    pub params: Option<serde_json::Value>,
    /// 发起者 ID
    pub operator_id: i64,
    /// 发起者名称快照
    pub operator_name: String,
}

/// 同步信号载荷 (服务端 -> 所有客户端)
///
/// 当某个资源发生变更时广播，通知所有感兴趣的客户端刷新数据。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    /// 资源类型 (例如: "product", "discount", "employee")
    pub resource: String,
    /// 版本号 (递增，用于前端判断是否需要全量刷新)
    pub version: u64,
    /// 变更类型 (例如: "created", "updated", "deleted")
    pub action: String,
    /// 资源 ID
    pub id: String,
    /// 资源数据 (可选，deleted 时为 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// 通用响应载荷 (服务端 -> 单个会话)
///
/// 用于响应 RequestCommand 的失败路径；成功路径走领域事件。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePayload {
    /// 是否成功
    pub success: bool,
    /// 响应消息/错误描述
    pub message: String,
    /// 错误代码 (可选, 仅在失败时有用)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

// ==================== Convenience Constructors ====================

impl NotificationPayload {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

impl ResponsePayload {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_code: None,
        }
    }

    pub fn error(message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_code: code,
        }
    }
}
