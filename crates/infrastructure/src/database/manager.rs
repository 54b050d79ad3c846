use std::time::Duration;

use preventive_config::DatabaseConfig;
use preventive_errors::{SyncError, SyncResult};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::info;

/// 进程级的数据库连接，启动时获取一次，结束时释放
pub struct DatabaseManager {
    pool: MySqlPool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> SyncResult<Self> {
        let url = normalize_url(&config.url);
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .connect(&url)
            .await
            .map_err(|e| SyncError::connection(e.to_string()))?;

        info!("数据库连接建立成功");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub async fn health_check(&self) -> SyncResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| SyncError::connection(e.to_string()))?;
        Ok(())
    }

    /// 健康检查失败时立即释放连接池再返回错误
    pub async fn ensure_healthy(&self) -> SyncResult<()> {
        if let Err(e) = self.health_check().await {
            self.close().await;
            return Err(e);
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("数据库连接已关闭");
    }
}

/// sqlx 只识别 mysql:// 前缀，MariaDB 地址在此改写
fn normalize_url(url: &str) -> String {
    match url.strip_prefix("mariadb://") {
        Some(rest) => format!("mysql://{rest}"),
        None => url.to_string(),
    }
}
