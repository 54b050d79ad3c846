use async_trait::async_trait;
use chrono::Local;
use preventive_domain::{
    Asset, CategoryKind, EntityKey, EntityRecord, FieldDirective, MaintenanceRepository,
    MaintenanceRule, RecurrentTicket,
};
use preventive_errors::SyncResult;
use sqlx::mysql::MySqlRow;
use sqlx::Row;
use tracing::{debug, instrument};

use super::schema;
use crate::database::store::{SqlParam, SqlStore};

/// 基于 GLPI 表结构的维护数据仓库
pub struct MySqlMaintenanceRepository {
    store: SqlStore,
}

impl MySqlMaintenanceRepository {
    pub fn new(store: SqlStore) -> Self {
        Self { store }
    }

    fn row_to_rule(row: &MySqlRow) -> SyncResult<MaintenanceRule> {
        let raw_tasks: Option<String> = row.try_get("tarefas")?;
        Ok(MaintenanceRule::new(
            row.try_get("categoria_id")?,
            row.try_get::<String, _>("categoria_name")?,
            raw_tasks.as_deref().unwrap_or_default(),
            row.try_get::<Option<i64>, _>("periodo")?.unwrap_or_default(),
        ))
    }

    fn row_to_asset(row: &MySqlRow) -> SyncResult<Asset> {
        Ok(Asset {
            id: row.try_get("id")?,
            entity_id: row.try_get("entities_id")?,
            entity_name: row
                .try_get::<Option<String>, _>("entity_name")?
                .unwrap_or_default(),
            serial_tag: row
                .try_get::<Option<String>, _>("otherserial")?
                .unwrap_or_default(),
            status_id: row.try_get("states_id")?,
            name: row
                .try_get::<Option<String>, _>("bem_name")?
                .unwrap_or_default(),
        })
    }

    async fn find_id(&self, sql: &str, params: &[SqlParam]) -> SyncResult<Option<i64>> {
        match self.store.fetch_one(sql, params).await? {
            Some(row) => Ok(Some(row.try_get("id")?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl MaintenanceRepository for MySqlMaintenanceRepository {
    #[instrument(skip(self))]
    async fn list_rules(&self) -> SyncResult<Vec<MaintenanceRule>> {
        let rows = self.store.fetch_all(schema::SELECT_RULES, &[]).await?;
        rows.iter().map(Self::row_to_rule).collect()
    }

    #[instrument(skip(self))]
    async fn list_active_assets(&self, category_id: i64) -> SyncResult<Vec<Asset>> {
        let rows = self
            .store
            .fetch_all(schema::SELECT_ACTIVE_ASSETS, &[category_id.into()])
            .await?;
        rows.iter().map(Self::row_to_asset).collect()
    }

    #[instrument(skip(self))]
    async fn deactivate_recurrents_of_inactive_assets(&self) -> SyncResult<u64> {
        self.store
            .execute_update(schema::DEACTIVATE_RECURRENTS, &[])
            .await
    }

    #[instrument(skip(self))]
    async fn reactivate_recurrents_of_active_assets(&self) -> SyncResult<u64> {
        self.store
            .execute_update(schema::REACTIVATE_RECURRENTS, &[])
            .await
    }

    #[instrument(skip(self), fields(kind = %key.kind()))]
    async fn find_entity_id(&self, key: &EntityKey) -> SyncResult<Option<i64>> {
        let (sql, params) = schema::lookup_statement(key);
        self.find_id(&sql, &params).await
    }

    #[instrument(skip(self))]
    async fn category_full_path(&self, kind: CategoryKind, id: i64) -> SyncResult<Option<String>> {
        let sql = schema::category_path_statement(kind);
        match self.store.fetch_one(&sql, &[id.into()]).await? {
            Some(row) => Ok(Some(
                row.try_get::<Option<String>, _>("completename")?
                    .unwrap_or_default(),
            )),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, record), fields(kind = %record.kind()))]
    async fn insert_entity(&self, record: &EntityRecord) -> SyncResult<i64> {
        let (sql, params) = schema::insert_statement(record, Local::now().naive_local());
        debug!(sql = %sql, "插入实体");
        self.store.execute_insert(&sql, &params).await
    }

    #[instrument(skip(self))]
    async fn find_recurrent_ticket(&self, name: &str) -> SyncResult<Option<i64>> {
        self.find_id(schema::SELECT_RECURRENT_BY_NAME, &[name.into()])
            .await
    }

    #[instrument(skip(self))]
    async fn insert_field_directive(
        &self,
        template_id: i64,
        directive: &FieldDirective,
    ) -> SyncResult<i64> {
        let (sql, params) = schema::directive_statement(template_id, directive);
        self.store.execute_insert(&sql, &params).await
    }

    #[instrument(skip(self, ticket), fields(name = %ticket.name))]
    async fn insert_recurrent_ticket(&self, ticket: &RecurrentTicket) -> SyncResult<i64> {
        let (sql, params) = schema::recurrent_statement(ticket);
        self.store.execute_insert(&sql, &params).await
    }
}
