//! 查找或创建
//!
//! 先按自然键查找，命中即复用；未命中时插入一条记录并返回新 id。
//! 分类的完整路径由父分类路径拼接，父分类查不到时以空串代替。

use std::sync::Arc;

use preventive_domain::entities::{
    CategoryDraft, CategoryKind, EntityDraft, EntityRecord, NewCategory, TaskTemplateDraft,
    TicketTemplateDraft,
};
use preventive_domain::naming;
use preventive_domain::repositories::MaintenanceRepository;
use preventive_domain::value_objects::CATEGORY_LEVEL;
use preventive_errors::SyncResult;
use tracing::{debug, info, warn};

/// 解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub id: i64,
    /// 本次调用新插入了记录
    pub created: bool,
}

pub struct EntityResolver {
    repository: Arc<dyn MaintenanceRepository>,
}

impl EntityResolver {
    pub fn new(repository: Arc<dyn MaintenanceRepository>) -> Self {
        Self { repository }
    }

    pub async fn find_or_create(&self, draft: &EntityDraft) -> SyncResult<Resolved> {
        let key = draft.key();
        if let Some(id) = self.repository.find_entity_id(&key).await? {
            debug!(kind = %key.kind(), name = key.name(), id, "实体已存在，复用");
            return Ok(Resolved { id, created: false });
        }

        let record = self.build_record(draft).await;
        let id = self.repository.insert_entity(&record).await?;
        info!(kind = %key.kind(), name = key.name(), id, "已创建实体");
        Ok(Resolved { id, created: true })
    }

    pub async fn category(
        &self,
        kind: CategoryKind,
        name: &str,
        parent_id: i64,
    ) -> SyncResult<Resolved> {
        self.find_or_create(&EntityDraft::Category(CategoryDraft {
            kind,
            name: name.to_string(),
            parent_id,
            level: CATEGORY_LEVEL,
        }))
        .await
    }

    pub async fn task_template(
        &self,
        category_name: &str,
        content: &str,
        task_category_id: i64,
    ) -> SyncResult<Resolved> {
        self.find_or_create(&EntityDraft::TaskTemplate(TaskTemplateDraft {
            name: naming::task_template_name(category_name),
            content: content.to_string(),
            task_category_id,
        }))
        .await
    }

    pub async fn ticket_template(
        &self,
        category_name: &str,
        entity_name: &str,
        serial_tag: &str,
        entity_id: i64,
    ) -> SyncResult<Resolved> {
        self.find_or_create(&EntityDraft::TicketTemplate(TicketTemplateDraft {
            name: naming::ticket_template_name(category_name, entity_name, serial_tag),
            entity_id,
        }))
        .await
    }

    async fn build_record(&self, draft: &EntityDraft) -> EntityRecord {
        match draft {
            EntityDraft::Category(category) => {
                let parent_path = self.parent_path(category.kind, category.parent_id).await;
                EntityRecord::Category(NewCategory {
                    kind: category.kind,
                    name: category.name.clone(),
                    parent_id: category.parent_id,
                    level: category.level,
                    full_path_name: naming::category_full_path(&parent_path, &category.name),
                })
            }
            EntityDraft::TaskTemplate(template) => EntityRecord::TaskTemplate(template.clone()),
            EntityDraft::TicketTemplate(template) => EntityRecord::TicketTemplate(template.clone()),
        }
    }

    async fn parent_path(&self, kind: CategoryKind, parent_id: i64) -> String {
        match self.repository.category_full_path(kind, parent_id).await {
            Ok(Some(path)) => path,
            Ok(None) => {
                warn!(kind = %kind.entity_kind(), parent_id, "父分类不存在，完整路径使用空前缀");
                String::new()
            }
            Err(e) => {
                warn!(kind = %kind.entity_kind(), parent_id, error = %e, "读取父分类路径失败，完整路径使用空前缀");
                String::new()
            }
        }
    }
}
