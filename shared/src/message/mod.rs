//! 消息总线消息类型定义
//!
//! 这些类型在 pos-server 和 clients 之间共享。坐标器发布领域事件到
//! 命名主题 (topic)，传输层决定哪些会话收到该主题。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

pub mod payload;
pub use payload::*;

use crate::order::PosEvent;

/// 协议版本号
pub const PROTOCOL_VERSION: u16 = 1;

/// 简化消息总线事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// 系统通知
    Notification = 0,
    /// 客户端请求
    RequestCommand = 1,
    /// 领域事件 (订单生命周期广播)
    OrderEvent = 2,
    /// 同步信号 (资源变更)
    Sync = 3,
    /// 请求响应
    Response = 4,
}

impl TryFrom<u8> for EventType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventType::Notification),
            1 => Ok(EventType::RequestCommand),
            2 => Ok(EventType::OrderEvent),
            3 => Ok(EventType::Sync),
            4 => Ok(EventType::Response),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Notification => write!(f, "notification"),
            EventType::RequestCommand => write!(f, "request_command"),
            EventType::OrderEvent => write!(f, "order_event"),
            EventType::Sync => write!(f, "sync"),
            EventType::Response => write!(f, "response"),
        }
    }
}

/// 广播主题 — 决定哪些会话看到一条消息
///
/// 坐标器只认识主题；会话与主题的映射在传输层 (MessageBus)。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "topic", content = "id")]
pub enum Topic {
    /// 所有已连接会话
    All,
    /// 员工/经理看板 (staff-channel)
    Staff,
    /// 顾客看板 (customer-channel)
    Customer,
    /// 单个会话 (session:<id>) — 定向回复
    Session(String),
}

impl Topic {
    /// 会话角色是否订阅该主题
    ///
    /// Staff 频道对 staff 和 manager 可见；Customer 频道对 customer 可见。
    pub fn matches(&self, session_id: &str, role: &str) -> bool {
        match self {
            Topic::All => true,
            Topic::Staff => role == "staff" || role == "manager",
            Topic::Customer => role == "customer",
            Topic::Session(id) => id == session_id,
        }
    }

    /// 频道名 (日志/调试用)
    pub fn channel_name(&self) -> String {
        match self {
            Topic::All => "all".to_string(),
            Topic::Staff => "staff-channel".to_string(),
            Topic::Customer => "customer-channel".to_string(),
            Topic::Session(id) => format!("session:{id}"),
        }
    }
}

/// 消息总线消息体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub request_id: Uuid,
    pub event_type: EventType,
    /// 投递主题 (入站消息恒为 All，由服务端处理)
    pub topic: Topic,
    /// 发起会话 ID (传输层填写，入站消息用)
    pub source: Option<String>,
    pub correlation_id: Option<Uuid>,
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(event_type: EventType, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            event_type,
            topic: Topic::All,
            source: None,
            correlation_id: None,
            payload,
        }
    }

    /// 设置投递主题
    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = topic;
        self
    }

    /// 设置来源会话
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    /// 设置关联 ID (用于 RPC 响应)
    pub fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }

    /// 创建领域事件消息
    pub fn order_event(topic: Topic, event: &PosEvent) -> Self {
        Self::new(
            EventType::OrderEvent,
            serde_json::to_vec(event).expect("Failed to serialize order event"),
        )
        .with_topic(topic)
    }

    /// 创建通知消息
    pub fn notification(payload: &NotificationPayload) -> Self {
        Self::new(
            EventType::Notification,
            serde_json::to_vec(payload).expect("Failed to serialize notification"),
        )
    }

    /// 创建请求指令消息 (客户端 -> 服务端)
    pub fn request_command(payload: &RequestCommandPayload) -> Self {
        Self::new(
            EventType::RequestCommand,
            serde_json::to_vec(payload).expect("Failed to serialize request command"),
        )
    }

    /// 创建同步信号消息
    pub fn sync(payload: &SyncPayload) -> Self {
        Self::new(
            EventType::Sync,
            serde_json::to_vec(payload).expect("Failed to serialize sync payload"),
        )
    }

    /// 创建响应消息 (定向到单个会话)
    pub fn response(session_id: &str, payload: &ResponsePayload) -> Self {
        Self::new(
            EventType::Response,
            serde_json::to_vec(payload).expect("Failed to serialize response payload"),
        )
        .with_topic(Topic::Session(session_id.to_string()))
    }

    /// 解析载荷为指定类型
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{PaymentSuccessPayload, PosEvent};

    #[test]
    fn test_topic_matching() {
        assert!(Topic::All.matches("s1", "customer"));
        assert!(Topic::Staff.matches("s1", "staff"));
        assert!(Topic::Staff.matches("s1", "manager"));
        assert!(!Topic::Staff.matches("s1", "customer"));
        assert!(Topic::Customer.matches("s1", "customer"));
        assert!(!Topic::Customer.matches("s1", "staff"));
        assert!(Topic::Session("s1".into()).matches("s1", "customer"));
        assert!(!Topic::Session("s1".into()).matches("s2", "customer"));
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(Topic::Staff.channel_name(), "staff-channel");
        assert_eq!(Topic::Customer.channel_name(), "customer-channel");
        assert_eq!(Topic::Session("abc".into()).channel_name(), "session:abc");
    }

    #[test]
    fn test_order_event_round_trip() {
        let msg = BusMessage::order_event(
            Topic::All,
            &PosEvent::PaymentSuccess(PaymentSuccessPayload::default()),
        );
        assert_eq!(msg.event_type, EventType::OrderEvent);
        let parsed: PosEvent = msg.parse_payload().unwrap();
        assert_eq!(parsed.name(), "payment_success");
    }

    #[test]
    fn test_event_type_from_u8() {
        assert_eq!(EventType::try_from(2u8), Ok(EventType::OrderEvent));
        assert!(EventType::try_from(9u8).is_err());
    }
}
