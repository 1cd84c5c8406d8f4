use std::sync::Arc;

use dashmap::DashMap;
use sqlx::SqlitePool;

use shared::message::{BusMessage, SyncPayload};

use crate::core::Config;
use crate::db::{DbService, seed};
use crate::message::bus::BusConfig;
use crate::message::{MessageBus, MessageHandler};
use crate::orders::OrderCoordinator;

/// 资源版本管理器
///
/// 使用 DashMap 实现无锁并发的版本号管理。
/// 每种资源类型维护独立的版本号，支持原子递增。
///
/// # 使用场景
///
/// 用于 broadcast_sync 时自动生成递增的版本号，
/// 确保客户端可以通过版本号判断数据新旧。
#[derive(Debug)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    /// 创建空的版本管理器
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// 递增指定资源的版本号并返回新值
    ///
    /// 如果资源不存在，从 0 开始递增（返回 1）
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 获取指定资源的当前版本号
    ///
    /// 如果资源不存在，返回 0
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

impl Default for ResourceVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// 服务器状态 - 持有所有服务的单例引用
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | bus | Arc<MessageBus> | 通知扇出总线 |
/// | coordinator | Arc<OrderCoordinator> | 订单协调器 |
/// | resource_versions | Arc<ResourceVersions> | 资源版本管理 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 消息总线
    pub bus: Arc<MessageBus>,
    /// 订单协调器
    pub coordinator: Arc<OrderCoordinator>,
    /// 资源版本管理器 (用于 broadcast_sync 自动递增版本号)
    pub resource_versions: Arc<ResourceVersions>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/pos.db) + 默认数据
    /// 3. 消息总线与订单协调器
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_path();
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        seed::ensure_defaults(&db_service.pool)
            .await
            .expect("Failed to seed default data");

        let bus = Arc::new(MessageBus::from_config(BusConfig {
            channel_capacity: config.bus_capacity,
        }));
        let coordinator = Arc::new(OrderCoordinator::new(
            db_service.pool.clone(),
            bus.clone(),
            config.tz(),
        ));

        Self {
            config: config.clone(),
            pool: db_service.pool,
            bus,
            coordinator,
            resource_versions: Arc::new(ResourceVersions::new()),
        }
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用
    ///
    /// 启动的任务：
    /// - 消息总线处理器 (MessageHandler)
    pub fn start_background_tasks(&self) {
        let handler = MessageHandler::new(self.bus.clone(), self.coordinator.clone());
        tokio::spawn(handler.run());
    }

    /// 广播同步消息
    ///
    /// 向所有连接的客户端广播资源变更通知。
    /// 版本号由 ResourceVersions 自动递增管理。
    ///
    /// # 参数
    /// - `resource`: 资源类型 (如 "product", "discount", "employee")
    /// - `action`: 变更类型 ("created", "updated", "deleted")
    /// - `id`: 资源 ID
    /// - `data`: 资源数据 (deleted 时为 None)
    pub async fn broadcast_sync<T: serde::Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) {
        let version = self.resource_versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        self.bus.publish(BusMessage::sync(&payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_versions_increment() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("product"), 0);
        assert_eq!(versions.increment("product"), 1);
        assert_eq!(versions.increment("product"), 2);
        // independent counters per resource
        assert_eq!(versions.increment("discount"), 1);
        assert_eq!(versions.get("product"), 2);
    }
}
