//! 消息总线核心实现
//!
//! # 消息流
//!
//! ```text
//! Session ──▶ submit() ───▶ client_tx ──▶ MessageHandler
//!                                      │
//! Server ──▶ publish() ──▶ server_tx ──┤
//!                                      ▼
//!                        Subscribed session pumps
//! ```
//!
//! 坐标器只发布 (topic, event)；每个会话的推送泵订阅 `server_tx` 并用
//! [`Topic::matches`] 过滤自己可见的消息。会话与角色的映射保存在
//! 总线的注册表里。

use std::sync::Arc;

use dashmap::DashMap;
use shared::message::{BusMessage, Topic};
use shared::order::PosEvent;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Configuration for the bus channels
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Capacity of the broadcast channels (default: 1024)
    pub channel_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

/// A connected session as seen by the fan-out layer
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub id: String,
    /// "manager" | "staff" | "customer" (decides channel visibility)
    pub role: String,
    /// Display name (for diagnostics)
    pub name: String,
}

/// 消息总线 - 负责消息路由和转发
///
/// # 职责
///
/// - 领域事件扇出 (publish, publish_event)
/// - 入站请求通道 (submit, subscribe_inbound)
/// - 会话注册表 (register_session, unregister_session)
#[derive(Debug, Clone)]
pub struct MessageBus {
    /// 客户端到服务器的消息通道
    client_tx: broadcast::Sender<BusMessage>,
    /// 服务器到客户端的广播通道
    server_tx: broadcast::Sender<BusMessage>,
    /// 关闭信号令牌
    shutdown_token: CancellationToken,
    /// 已连接的会话 (Session ID -> SessionInfo)
    sessions: Arc<DashMap<String, SessionInfo>>,
}

impl MessageBus {
    /// 创建默认配置的消息总线
    pub fn new() -> Self {
        Self::from_config(BusConfig::default())
    }

    /// 从配置创建消息总线
    pub fn from_config(config: BusConfig) -> Self {
        let (client_tx, _) = broadcast::channel(config.channel_capacity);
        let (server_tx, _) = broadcast::channel(config.channel_capacity);
        Self {
            client_tx,
            server_tx,
            shutdown_token: CancellationToken::new(),
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// 发布消息 (服务器 -> 订阅者)
    ///
    /// Fire-and-forget：没有订阅者时只记日志，不报错。
    pub fn publish(&self, msg: BusMessage) {
        if self.server_tx.send(msg).is_err() {
            tracing::debug!("Broadcast dropped: no active receivers");
        }
    }

    /// 发布领域事件到指定主题
    pub fn publish_event(&self, topic: Topic, event: &PosEvent) {
        tracing::debug!(event = event.name(), channel = %topic.channel_name(), "Publishing event");
        self.publish(BusMessage::order_event(topic, event));
    }

    /// 提交入站请求 (会话 -> 服务器)
    ///
    /// 消息通过 broadcast 通道送达 MessageHandler 处理
    pub fn submit(&self, msg: BusMessage) {
        if self.client_tx.send(msg).is_err() {
            tracing::warn!("Inbound request dropped: message handler not running");
        }
    }

    /// 订阅入站请求 (MessageHandler 专用)
    pub fn subscribe_inbound(&self) -> broadcast::Receiver<BusMessage> {
        self.client_tx.subscribe()
    }

    /// 订阅服务器广播 (会话推送泵专用)
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.server_tx.subscribe()
    }

    /// 注册会话 (连接建立时)
    pub fn register_session(&self, session: SessionInfo) {
        tracing::info!(session_id = %session.id, role = %session.role, "Session connected");
        self.sessions.insert(session.id.clone(), session);
    }

    /// 注销会话 (连接断开时)
    pub fn unregister_session(&self, session_id: &str) {
        if self.sessions.remove(session_id).is_some() {
            tracing::info!(session_id, "Session disconnected");
        }
    }

    /// 主题在当前注册表下的接收会话列表
    pub fn recipients(&self, topic: &Topic) -> Vec<SessionInfo> {
        self.sessions
            .iter()
            .filter(|entry| topic.matches(&entry.value().id, &entry.value().role))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// 获取已连接会话列表
    pub fn connected_sessions(&self) -> Vec<SessionInfo> {
        self.sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// 获取关闭令牌 (用于监控关闭信号)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 优雅关闭消息总线
    pub fn shutdown(&self) {
        tracing::info!("Shutting down message bus");
        self.shutdown_token.cancel();
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}
