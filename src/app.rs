use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use preventive_config::AppConfig;
use preventive_infrastructure::{DatabaseManager, MySqlMaintenanceRepository, SqlStore};
use preventive_reconciler::{settings_from_config, ReconciliationEngine, RunPhase, RunReport};
use tracing::info;

/// 主应用程序：一次性执行，完成后退出
pub struct Application {
    config: AppConfig,
    phase: RunPhase,
}

impl Application {
    pub fn new(config: AppConfig, phase: RunPhase) -> Self {
        Self { config, phase }
    }

    pub async fn run(&self) -> Result<RunReport> {
        info!("连接数据库");
        let manager = DatabaseManager::new(&self.config.database)
            .await
            .context("连接数据库失败")?;
        manager
            .ensure_healthy()
            .await
            .context("数据库健康检查失败")?;

        let repository = Arc::new(MySqlMaintenanceRepository::new(SqlStore::new(
            manager.pool().clone(),
        )));
        let engine = ReconciliationEngine::new(repository, settings_from_config(&self.config));

        let report = engine.run(self.phase, Local::now().naive_local()).await;

        manager.close().await;
        Ok(report)
    }
}
