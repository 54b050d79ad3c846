//! 存储抽象
//!
//! 协调引擎只依赖这里的接口，生产环境使用 MySQL 实现，测试使用内存实现。
//! 每次写操作独立提交，不存在跨语句事务。

use async_trait::async_trait;
use preventive_errors::SyncResult;

use crate::entities::{
    Asset, CategoryKind, EntityKey, EntityRecord, FieldDirective, MaintenanceRule,
    RecurrentTicket,
};

#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    /// 读取全部维护规则，顺序由存储决定
    async fn list_rules(&self) -> SyncResult<Vec<MaintenanceRule>>;

    /// 读取某资产分类下所有在用资产
    async fn list_active_assets(&self, category_id: i64) -> SyncResult<Vec<Asset>>;

    /// 批量停用资产已不在用的周期工单，返回受影响行数
    async fn deactivate_recurrents_of_inactive_assets(&self) -> SyncResult<u64>;

    /// 批量重新启用资产恢复在用的周期工单，返回受影响行数
    async fn reactivate_recurrents_of_active_assets(&self) -> SyncResult<u64>;

    async fn find_entity_id(&self, key: &EntityKey) -> SyncResult<Option<i64>>;

    async fn category_full_path(&self, kind: CategoryKind, id: i64) -> SyncResult<Option<String>>;

    async fn insert_entity(&self, record: &EntityRecord) -> SyncResult<i64>;

    async fn find_recurrent_ticket(&self, name: &str) -> SyncResult<Option<i64>>;

    async fn insert_field_directive(
        &self,
        template_id: i64,
        directive: &FieldDirective,
    ) -> SyncResult<i64>;

    async fn insert_recurrent_ticket(&self, ticket: &RecurrentTicket) -> SyncResult<i64>;
}
