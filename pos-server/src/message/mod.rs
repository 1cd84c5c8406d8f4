//! 消息总线 - 实时通知扇出
//!
//! # 架构
//!
//! ```text
//! Session ──▶ submit() ──▶ client_tx ──▶ MessageHandler ──▶ OrderCoordinator
//!                                                                │
//! Coordinator ─▶ publish(topic, event) ─▶ server_tx ─────────────┘
//!                                            │
//!                              per-session pumps filter by Topic
//! ```
//!
//! 广播是 fire-and-forget：没有重试、没有补发。断线重连的会话通过
//! 读取 API 重新拉取状态，而不是依赖事件回放。

pub mod bus;
pub mod handler;

pub use bus::{MessageBus, SessionInfo};
pub use handler::MessageHandler;
