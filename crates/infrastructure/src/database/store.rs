//! 通用语句执行器
//!
//! 对参数化 SQL 提供四种操作：读取多行、读取单行、插入并返回新 ID、更新并返回受影响行数。
//! 每条写语句在自己的事务里执行并立即提交，失败时只回滚这一条语句。

use chrono::NaiveDateTime;
use preventive_errors::{SyncError, SyncResult};
use sqlx::mysql::{MySqlArguments, MySqlPool, MySqlQueryResult, MySqlRow};
use sqlx::query::Query;
use sqlx::MySql;
use tracing::{debug, error, info};

/// 语句参数
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Int(value)
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Int(i64::from(value))
    }
}

impl From<bool> for SqlParam {
    fn from(value: bool) -> Self {
        SqlParam::Int(i64::from(value))
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<NaiveDateTime> for SqlParam {
    fn from(value: NaiveDateTime) -> Self {
        SqlParam::DateTime(value)
    }
}

#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: MySqlPool,
}

impl SqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn bind<'q>(sql: &'q str, params: &'q [SqlParam]) -> Query<'q, MySql, MySqlArguments> {
        params
            .iter()
            .fold(sqlx::query(sql), |query, param| match param {
                SqlParam::Int(v) => query.bind(*v),
                SqlParam::Text(v) => query.bind(v.as_str()),
                SqlParam::DateTime(v) => query.bind(*v),
            })
    }

    pub async fn fetch_all(&self, sql: &str, params: &[SqlParam]) -> SyncResult<Vec<MySqlRow>> {
        Self::bind(sql, params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "执行查询失败 (fetch_all)");
                SyncError::statement("fetch_all", e)
            })
    }

    pub async fn fetch_one(&self, sql: &str, params: &[SqlParam]) -> SyncResult<Option<MySqlRow>> {
        Self::bind(sql, params)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "执行查询失败 (fetch_one)");
                SyncError::statement("fetch_one", e)
            })
    }

    /// 执行插入并返回新行 ID
    pub async fn execute_insert(&self, sql: &str, params: &[SqlParam]) -> SyncResult<i64> {
        let result = self.execute_committed("execute_insert", sql, params).await?;
        let id = i64::try_from(result.last_insert_id()).map_err(|_| {
            SyncError::Internal(format!("插入ID超出范围: {}", result.last_insert_id()))
        })?;
        info!(id, "记录插入成功");
        Ok(id)
    }

    /// 执行更新并返回受影响行数
    pub async fn execute_update(&self, sql: &str, params: &[SqlParam]) -> SyncResult<u64> {
        let result = self.execute_committed("execute_update", sql, params).await?;
        let row_count = result.rows_affected();
        info!(row_count, "{row_count} 行受更新影响");
        Ok(row_count)
    }

    async fn execute_committed(
        &self,
        statement: &'static str,
        sql: &str,
        params: &[SqlParam],
    ) -> SyncResult<MySqlQueryResult> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SyncError::statement(statement, e))?;

        match Self::bind(sql, params).execute(&mut *tx).await {
            Ok(result) => {
                tx.commit()
                    .await
                    .map_err(|e| SyncError::statement(statement, e))?;
                debug!(statement, "语句已提交");
                Ok(result)
            }
            Err(e) => {
                error!(statement, error = %e, "语句执行失败，回滚");
                if let Err(rollback_err) = tx.rollback().await {
                    error!(statement, error = %rollback_err, "回滚失败");
                }
                Err(SyncError::statement(statement, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_sql_param_conversions() {
        assert_eq!(SqlParam::from(5_i32), SqlParam::Int(5));
        assert_eq!(SqlParam::from(true), SqlParam::Int(1));
        assert_eq!(SqlParam::from(false), SqlParam::Int(0));
        assert_eq!(SqlParam::from("PL100"), SqlParam::Text("PL100".to_string()));

        let at = NaiveDate::from_ymd_opt(2025, 2, 28)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap();
        assert_eq!(SqlParam::from(at), SqlParam::DateTime(at));
    }
}
