//! 内存版 MaintenanceRepository
//!
//! 用于引擎测试，不需要数据库连接。所有表存放在同一把锁下，
//! 可以按调用点注入失败以覆盖降级路径。

use async_trait::async_trait;
use preventive_domain::entities::{
    Asset, CategoryKind, EntityKey, EntityKind, EntityRecord, FieldDirective, MaintenanceRule,
    RecurrentTicket,
};
use preventive_domain::naming::serial_tag_from_name;
use preventive_domain::repositories::MaintenanceRepository;
use preventive_errors::{SyncError, SyncResult};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::builders::{INCIDENT_ROOT_ID, TASK_ROOT_ID};

/// 可注入失败的调用点
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    ListRules,
    ListAssets { category_id: i64 },
    Lookup(EntityKind),
    Insert(EntityKind),
    /// 仅对指定内容的任务模板插入失败
    TaskTemplateContent(String),
    ParentPath,
    FieldDirective { num: i32 },
    RecurrentLookup,
    RecurrentInsert,
    Deactivate,
    Reactivate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCategory {
    pub id: i64,
    pub kind: CategoryKind,
    pub name: String,
    pub parent_id: i64,
    pub level: i32,
    pub full_path_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTaskTemplate {
    pub id: i64,
    pub name: String,
    pub content: String,
    pub task_category_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTicketTemplate {
    pub id: i64,
    pub name: String,
    pub entity_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecurrent {
    pub id: i64,
    pub ticket: RecurrentTicket,
}

#[derive(Debug, Default)]
struct Tables {
    rules: Vec<MaintenanceRule>,
    assets: Vec<(i64, Asset)>,
    categories: Vec<StoredCategory>,
    task_templates: Vec<StoredTaskTemplate>,
    ticket_templates: Vec<StoredTicketTemplate>,
    directives: Vec<(i64, FieldDirective)>,
    recurrents: Vec<StoredRecurrent>,
    failures: HashSet<FailurePoint>,
    next_id: i64,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn reserve(&mut self, id: i64) {
        self.next_id = self.next_id.max(id);
    }

    fn check(&self, point: FailurePoint) -> SyncResult<()> {
        if self.failures.contains(&point) {
            return Err(SyncError::statement(
                format!("{point:?}"),
                "injected failure",
            ));
        }
        Ok(())
    }

    fn serial_matches(&self, recurrent_name: &str, active: bool) -> bool {
        let tag = serial_tag_from_name(recurrent_name);
        self.assets
            .iter()
            .any(|(_, asset)| asset.serial_tag == tag && asset.is_active() == active)
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryMaintenanceRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryMaintenanceRepository {
    /// 空存储，预置 id 为 INCIDENT_ROOT_ID 与 TASK_ROOT_ID 的根分类
    pub fn new() -> Self {
        let repo = Self::empty();
        repo.seed_category(CategoryKind::Incident, INCIDENT_ROOT_ID, "Preventivas", 0, "Preventivas");
        repo.seed_category(CategoryKind::Task, TASK_ROOT_ID, "Preventivas", 0, "Preventivas");
        repo
    }

    /// 不含任何分类
    pub fn empty() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables {
                next_id: 1000,
                ..Tables::default()
            })),
        }
    }

    pub fn with_rules(self, rules: Vec<MaintenanceRule>) -> Self {
        self.tables.lock().unwrap().rules = rules;
        self
    }

    pub fn add_rule(&self, rule: MaintenanceRule) {
        self.tables.lock().unwrap().rules.push(rule);
    }

    pub fn add_asset(&self, category_id: i64, asset: Asset) {
        self.tables.lock().unwrap().assets.push((category_id, asset));
    }

    pub fn set_asset_status(&self, asset_id: i64, status_id: i64) {
        let mut tables = self.tables.lock().unwrap();
        for (_, asset) in tables.assets.iter_mut().filter(|(_, a)| a.id == asset_id) {
            asset.status_id = status_id;
        }
    }

    pub fn seed_category(
        &self,
        kind: CategoryKind,
        id: i64,
        name: &str,
        parent_id: i64,
        full_path_name: &str,
    ) {
        let mut tables = self.tables.lock().unwrap();
        tables.reserve(id);
        tables.categories.push(StoredCategory {
            id,
            kind,
            name: name.to_string(),
            parent_id,
            level: 1,
            full_path_name: full_path_name.to_string(),
        });
    }

    pub fn seed_ticket_template(&self, id: i64, name: &str, entity_id: i64) {
        let mut tables = self.tables.lock().unwrap();
        tables.reserve(id);
        tables.ticket_templates.push(StoredTicketTemplate {
            id,
            name: name.to_string(),
            entity_id,
        });
    }

    pub fn seed_recurrent(&self, id: i64, ticket: RecurrentTicket) {
        let mut tables = self.tables.lock().unwrap();
        tables.reserve(id);
        tables.recurrents.push(StoredRecurrent { id, ticket });
    }

    pub fn fail_at(&self, point: FailurePoint) {
        self.tables.lock().unwrap().failures.insert(point);
    }

    pub fn clear_failures(&self) {
        self.tables.lock().unwrap().failures.clear();
    }

    pub fn categories(&self, kind: CategoryKind) -> Vec<StoredCategory> {
        self.tables
            .lock()
            .unwrap()
            .categories
            .iter()
            .filter(|c| c.kind == kind)
            .cloned()
            .collect()
    }

    pub fn task_templates(&self) -> Vec<StoredTaskTemplate> {
        self.tables.lock().unwrap().task_templates.clone()
    }

    pub fn ticket_templates(&self) -> Vec<StoredTicketTemplate> {
        self.tables.lock().unwrap().ticket_templates.clone()
    }

    pub fn directives_for(&self, template_id: i64) -> Vec<FieldDirective> {
        self.tables
            .lock()
            .unwrap()
            .directives
            .iter()
            .filter(|(id, _)| *id == template_id)
            .map(|(_, d)| d.clone())
            .collect()
    }

    pub fn directive_count(&self) -> usize {
        self.tables.lock().unwrap().directives.len()
    }

    pub fn recurrent_tickets(&self) -> Vec<StoredRecurrent> {
        self.tables.lock().unwrap().recurrents.clone()
    }

    pub fn recurrent_by_name(&self, name: &str) -> Option<StoredRecurrent> {
        self.tables
            .lock()
            .unwrap()
            .recurrents
            .iter()
            .find(|r| r.ticket.name == name)
            .cloned()
    }
}

impl Default for InMemoryMaintenanceRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MaintenanceRepository for InMemoryMaintenanceRepository {
    async fn list_rules(&self) -> SyncResult<Vec<MaintenanceRule>> {
        let tables = self.tables.lock().unwrap();
        tables.check(FailurePoint::ListRules)?;
        Ok(tables.rules.clone())
    }

    async fn list_active_assets(&self, category_id: i64) -> SyncResult<Vec<Asset>> {
        let tables = self.tables.lock().unwrap();
        tables.check(FailurePoint::ListAssets { category_id })?;
        Ok(tables
            .assets
            .iter()
            .filter(|(category, asset)| *category == category_id && asset.is_active())
            .map(|(_, asset)| asset.clone())
            .collect())
    }

    async fn deactivate_recurrents_of_inactive_assets(&self) -> SyncResult<u64> {
        let mut tables = self.tables.lock().unwrap();
        tables.check(FailurePoint::Deactivate)?;

        let targets: Vec<usize> = tables
            .recurrents
            .iter()
            .enumerate()
            .filter(|(_, r)| r.ticket.active && tables.serial_matches(&r.ticket.name, false))
            .map(|(i, _)| i)
            .collect();
        for &i in &targets {
            tables.recurrents[i].ticket.active = false;
        }
        Ok(targets.len() as u64)
    }

    async fn reactivate_recurrents_of_active_assets(&self) -> SyncResult<u64> {
        let mut tables = self.tables.lock().unwrap();
        tables.check(FailurePoint::Reactivate)?;

        let targets: Vec<usize> = tables
            .recurrents
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.ticket.active && tables.serial_matches(&r.ticket.name, true))
            .map(|(i, _)| i)
            .collect();
        for &i in &targets {
            tables.recurrents[i].ticket.active = true;
        }
        Ok(targets.len() as u64)
    }

    async fn find_entity_id(&self, key: &EntityKey) -> SyncResult<Option<i64>> {
        let tables = self.tables.lock().unwrap();
        tables.check(FailurePoint::Lookup(key.kind()))?;

        let id = match key {
            EntityKey::Category {
                kind,
                name,
                parent_id,
            } => tables
                .categories
                .iter()
                .find(|c| c.kind == *kind && &c.name == name && c.parent_id == *parent_id)
                .map(|c| c.id),
            EntityKey::TaskTemplate { name, content } => tables
                .task_templates
                .iter()
                .find(|t| &t.name == name && &t.content == content)
                .map(|t| t.id),
            EntityKey::TicketTemplate { name, entity_id } => tables
                .ticket_templates
                .iter()
                .find(|t| &t.name == name && t.entity_id == *entity_id)
                .map(|t| t.id),
        };
        Ok(id)
    }

    async fn category_full_path(&self, kind: CategoryKind, id: i64) -> SyncResult<Option<String>> {
        let tables = self.tables.lock().unwrap();
        tables.check(FailurePoint::ParentPath)?;
        Ok(tables
            .categories
            .iter()
            .find(|c| c.kind == kind && c.id == id)
            .map(|c| c.full_path_name.clone()))
    }

    async fn insert_entity(&self, record: &EntityRecord) -> SyncResult<i64> {
        let mut tables = self.tables.lock().unwrap();
        tables.check(FailurePoint::Insert(record.kind()))?;

        match record {
            EntityRecord::Category(category) => {
                let id = tables.allocate_id();
                tables.categories.push(StoredCategory {
                    id,
                    kind: category.kind,
                    name: category.name.clone(),
                    parent_id: category.parent_id,
                    level: category.level,
                    full_path_name: category.full_path_name.clone(),
                });
                Ok(id)
            }
            EntityRecord::TaskTemplate(template) => {
                tables.check(FailurePoint::TaskTemplateContent(template.content.clone()))?;
                let id = tables.allocate_id();
                tables.task_templates.push(StoredTaskTemplate {
                    id,
                    name: template.name.clone(),
                    content: template.content.clone(),
                    task_category_id: template.task_category_id,
                });
                Ok(id)
            }
            EntityRecord::TicketTemplate(template) => {
                let id = tables.allocate_id();
                tables.ticket_templates.push(StoredTicketTemplate {
                    id,
                    name: template.name.clone(),
                    entity_id: template.entity_id,
                });
                Ok(id)
            }
        }
    }

    async fn find_recurrent_ticket(&self, name: &str) -> SyncResult<Option<i64>> {
        let tables = self.tables.lock().unwrap();
        tables.check(FailurePoint::RecurrentLookup)?;
        Ok(tables
            .recurrents
            .iter()
            .find(|r| r.ticket.name == name)
            .map(|r| r.id))
    }

    async fn insert_field_directive(
        &self,
        template_id: i64,
        directive: &FieldDirective,
    ) -> SyncResult<i64> {
        let mut tables = self.tables.lock().unwrap();
        tables.check(FailurePoint::FieldDirective {
            num: directive.num(),
        })?;
        let id = tables.allocate_id();
        tables.directives.push((template_id, directive.clone()));
        Ok(id)
    }

    async fn insert_recurrent_ticket(&self, ticket: &RecurrentTicket) -> SyncResult<i64> {
        let mut tables = self.tables.lock().unwrap();
        tables.check(FailurePoint::RecurrentInsert)?;
        let id = tables.allocate_id();
        tables.recurrents.push(StoredRecurrent {
            id,
            ticket: ticket.clone(),
        });
        Ok(id)
    }
}
