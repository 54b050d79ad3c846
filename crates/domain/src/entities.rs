use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 资产处于"在用"状态时的 states_id
pub const ACTIVE_STATUS_ID: i64 = 1;

/// 预防性维护规则：一个资产分类对应一组任务与周期
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRule {
    pub category_id: i64,
    pub category_name: String,
    pub task_descriptions: Vec<String>,
    /// 周期，单位秒
    pub periodicity: i64,
}

impl MaintenanceRule {
    pub fn new(
        category_id: i64,
        category_name: impl Into<String>,
        raw_tasks: &str,
        periodicity: i64,
    ) -> Self {
        Self {
            category_id,
            category_name: category_name.into(),
            task_descriptions: Self::parse_task_list(raw_tasks),
            periodicity,
        }
    }

    /// 按 ';' 拆分任务列表，去除首尾空白并丢弃空项，保持原有顺序
    pub fn parse_task_list(raw: &str) -> Vec<String> {
        raw.split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub entity_id: i64,
    pub entity_name: String,
    pub serial_tag: String,
    pub status_id: i64,
    pub name: String,
}

impl Asset {
    pub fn is_active(&self) -> bool {
        self.status_id == ACTIVE_STATUS_ID
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKind {
    /// ITIL 工单分类
    Incident,
    /// 任务分类
    Task,
}

impl CategoryKind {
    pub fn entity_kind(self) -> EntityKind {
        match self {
            CategoryKind::Incident => EntityKind::IncidentCategory,
            CategoryKind::Task => EntityKind::TaskCategory,
        }
    }
}

/// 可去重实体的种类，每种对应固定的表与列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    IncidentCategory,
    TaskCategory,
    TaskTemplate,
    TicketTemplate,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::IncidentCategory => "incident_category",
            EntityKind::TaskCategory => "task_category",
            EntityKind::TaskTemplate => "task_template",
            EntityKind::TicketTemplate => "ticket_template",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 去重查找使用的自然键（精确相等的合取条件）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Category {
        kind: CategoryKind,
        name: String,
        parent_id: i64,
    },
    TaskTemplate {
        name: String,
        content: String,
    },
    TicketTemplate {
        name: String,
        entity_id: i64,
    },
}

impl EntityKey {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityKey::Category { kind, .. } => kind.entity_kind(),
            EntityKey::TaskTemplate { .. } => EntityKind::TaskTemplate,
            EntityKey::TicketTemplate { .. } => EntityKind::TicketTemplate,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EntityKey::Category { name, .. }
            | EntityKey::TaskTemplate { name, .. }
            | EntityKey::TicketTemplate { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub kind: CategoryKind,
    pub name: String,
    pub parent_id: i64,
    pub level: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTemplateDraft {
    pub name: String,
    pub content: String,
    pub task_category_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketTemplateDraft {
    pub name: String,
    pub entity_id: i64,
}

/// 待解析的实体：自然键加上插入时需要的附加字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityDraft {
    Category(CategoryDraft),
    TaskTemplate(TaskTemplateDraft),
    TicketTemplate(TicketTemplateDraft),
}

impl EntityDraft {
    pub fn key(&self) -> EntityKey {
        match self {
            EntityDraft::Category(c) => EntityKey::Category {
                kind: c.kind,
                name: c.name.clone(),
                parent_id: c.parent_id,
            },
            EntityDraft::TaskTemplate(t) => EntityKey::TaskTemplate {
                name: t.name.clone(),
                content: t.content.clone(),
            },
            EntityDraft::TicketTemplate(t) => EntityKey::TicketTemplate {
                name: t.name.clone(),
                entity_id: t.entity_id,
            },
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityDraft::Category(c) => c.kind.entity_kind(),
            EntityDraft::TaskTemplate(_) => EntityKind::TaskTemplate,
            EntityDraft::TicketTemplate(_) => EntityKind::TicketTemplate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub kind: CategoryKind,
    pub name: String,
    pub parent_id: i64,
    pub level: i32,
    /// 父分类路径 + " > " + 名称
    pub full_path_name: String,
}

/// 实际写入存储的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRecord {
    Category(NewCategory),
    TaskTemplate(TaskTemplateDraft),
    TicketTemplate(TicketTemplateDraft),
}

impl EntityRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRecord::Category(c) => c.kind.entity_kind(),
            EntityRecord::TaskTemplate(_) => EntityKind::TaskTemplate,
            EntityRecord::TicketTemplate(_) => EntityKind::TicketTemplate,
        }
    }
}

/// 工单模板上的字段指令
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldDirective {
    Hidden { num: i32 },
    Mandatory { num: i32 },
    Predefined { num: i32, value: String },
}

impl FieldDirective {
    pub fn num(&self) -> i32 {
        match self {
            FieldDirective::Hidden { num }
            | FieldDirective::Mandatory { num }
            | FieldDirective::Predefined { num, .. } => *num,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrentTicket {
    pub name: String,
    pub entity_id: i64,
    pub active: bool,
    pub template_id: i64,
    pub begin_date: NaiveDateTime,
    pub periodicity: i64,
    pub calendar_id: i64,
    pub next_creation_date: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_task_list_keeps_order_and_drops_empty() {
        let tasks = MaintenanceRule::parse_task_list(" Check filters ;; Replace belt;  ;Lubrificar");
        assert_eq!(tasks, vec!["Check filters", "Replace belt", "Lubrificar"]);
    }

    #[test]
    fn test_parse_task_list_empty() {
        assert!(MaintenanceRule::parse_task_list("").is_empty());
        assert!(MaintenanceRule::parse_task_list(" ; ;").is_empty());
    }

    #[test]
    fn test_asset_activity() {
        let mut asset = Asset {
            id: 1,
            entity_id: 2,
            entity_name: "Loja 01".to_string(),
            serial_tag: "PL100".to_string(),
            status_id: ACTIVE_STATUS_ID,
            name: "Ar condicionado".to_string(),
        };
        assert!(asset.is_active());
        asset.status_id = 3;
        assert!(!asset.is_active());
    }

    #[test]
    fn test_draft_key_matches_kind() {
        let draft = EntityDraft::Category(CategoryDraft {
            kind: CategoryKind::Task,
            name: "Climatização".to_string(),
            parent_id: 8,
            level: 2,
        });
        let key = draft.key();
        assert_eq!(key.kind(), EntityKind::TaskCategory);
        assert_eq!(draft.kind(), key.kind());
        assert_eq!(key.name(), "Climatização");

        let draft = EntityDraft::TicketTemplate(TicketTemplateDraft {
            name: "Preventiva - X".to_string(),
            entity_id: 4,
        });
        assert_eq!(
            draft.key(),
            EntityKey::TicketTemplate {
                name: "Preventiva - X".to_string(),
                entity_id: 4
            }
        );
    }
}
