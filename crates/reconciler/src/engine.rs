//! 协调引擎
//!
//! 一次运行分两个阶段：先按资产状态批量停用或恢复周期工单，
//! 再为每条规则下每个在用资产补齐缺失的分类、模板与周期工单。
//! 所有步骤按顺序执行，单元级失败只记录并跳过，不会中断整次运行。

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDateTime;
use preventive_domain::entities::{Asset, CategoryKind, MaintenanceRule, RecurrentTicket};
use preventive_domain::naming;
use preventive_domain::repositories::MaintenanceRepository;
use preventive_domain::value_objects::ReconcileSettings;
use preventive_errors::SyncResult;
use serde::Serialize;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::recurrence::{DayFallback, Occurrence, RecurrenceScheduler};
use crate::report::{CreationReport, RunReport, StatusSyncReport};
use crate::resolver::EntityResolver;
use crate::stamping;

/// 要执行的阶段
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    #[default]
    All,
    Sync,
    Create,
}

impl RunPhase {
    pub fn includes_sync(self) -> bool {
        matches!(self, RunPhase::All | RunPhase::Sync)
    }

    pub fn includes_create(self) -> bool {
        matches!(self, RunPhase::All | RunPhase::Create)
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::All => "all",
            RunPhase::Sync => "sync",
            RunPhase::Create => "create",
        };
        f.write_str(name)
    }
}

impl FromStr for RunPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(RunPhase::All),
            "sync" => Ok(RunPhase::Sync),
            "create" => Ok(RunPhase::Create),
            other => Err(format!("未知的阶段: {other}")),
        }
    }
}

/// 规则对应的两个分类 id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleCategories {
    pub incident_category_id: i64,
    pub task_category_id: i64,
}

/// 规则的任务模板 id，按任务列表顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTasks {
    pub ids: Vec<i64>,
    pub failed: usize,
}

/// 单个资产的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOutcome {
    /// 同名周期工单已存在，未做任何写入
    AlreadyScheduled { recurrent_id: i64 },
    Scheduled {
        template_id: i64,
        template_created: bool,
        directives_failed: usize,
        recurrent_id: i64,
    },
}

pub struct ReconciliationEngine {
    repository: Arc<dyn MaintenanceRepository>,
    resolver: EntityResolver,
    settings: ReconcileSettings,
}

impl ReconciliationEngine {
    pub fn new(repository: Arc<dyn MaintenanceRepository>, settings: ReconcileSettings) -> Self {
        Self {
            resolver: EntityResolver::new(repository.clone()),
            repository,
            settings,
        }
    }

    /// 执行一次协调，reference 为计算下次开始时间的参考时刻
    pub async fn run(&self, phase: RunPhase, reference: NaiveDateTime) -> RunReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("reconcile_run", run_id = %run_id, phase = %phase);

        async move {
            info!("开始预防性维护协调");

            let status = if phase.includes_sync() {
                Some(self.sync_status().await)
            } else {
                None
            };

            let creation = if phase.includes_create() {
                Some(self.create_missing(reference).await)
            } else {
                None
            };

            let report = RunReport {
                run_id,
                phase,
                status,
                creation,
            };

            if report.is_degraded() {
                warn!(?report, "协调完成，部分单元被跳过");
            } else {
                info!(?report, "协调完成");
            }
            report
        }
        .instrument(span)
        .await
    }

    /// 状态同步：先停用再恢复，两条语句相互独立
    pub async fn sync_status(&self) -> StatusSyncReport {
        info!("--- 开始状态同步 ---");

        let deactivated = match self
            .repository
            .deactivate_recurrents_of_inactive_assets()
            .await
        {
            Ok(count) => {
                info!(count, "已停用资产不在用的周期工单");
                Some(count)
            }
            Err(e) => {
                error!(error = %e, "停用周期工单失败");
                None
            }
        };

        let reactivated = match self
            .repository
            .reactivate_recurrents_of_active_assets()
            .await
        {
            Ok(count) => {
                info!(count, "已恢复资产重新在用的周期工单");
                Some(count)
            }
            Err(e) => {
                error!(error = %e, "恢复周期工单失败");
                None
            }
        };

        StatusSyncReport {
            deactivated,
            reactivated,
        }
    }

    /// 创建阶段
    pub async fn create_missing(&self, reference: NaiveDateTime) -> CreationReport {
        info!("--- 开始创建阶段 ---");
        let mut report = CreationReport::default();

        let rules = match self.repository.list_rules().await {
            Ok(rules) => rules,
            Err(e) => {
                error!(error = %e, "读取维护规则失败，跳过创建阶段");
                report.rules_unavailable = true;
                return report;
            }
        };
        info!(count = rules.len(), "读取到维护规则");

        let occurrence =
            RecurrenceScheduler::next_occurrence(reference, self.settings.start_day_of_month);
        log_fallback(&occurrence);

        for rule in &rules {
            let span = info_span!(
                "rule",
                category_id = rule.category_id,
                category = %rule.category_name
            );
            self.process_rule(rule, occurrence.at, &mut report)
                .instrument(span)
                .await;
        }

        report
    }

    async fn process_rule(
        &self,
        rule: &MaintenanceRule,
        begin_date: NaiveDateTime,
        report: &mut CreationReport,
    ) {
        report.rules_seen += 1;

        let assets = match self.repository.list_active_assets(rule.category_id).await {
            Ok(assets) => assets,
            Err(e) => {
                error!(error = %e, "读取资产失败，跳过该规则");
                report.rules_failed += 1;
                return;
            }
        };
        if assets.is_empty() {
            info!("没有在用资产，跳过该规则");
            report.rules_skipped += 1;
            return;
        }
        debug!(count = assets.len(), "在用资产");

        let categories = match self.resolve_rule_categories(rule).await {
            Ok(categories) => categories,
            Err(e) => {
                error!(error = %e, "解析分类失败，跳过该规则");
                report.rules_failed += 1;
                return;
            }
        };

        let tasks = self
            .resolve_task_templates(rule, categories.task_category_id)
            .await;
        report.task_templates_resolved += tasks.ids.len();
        report.task_templates_failed += tasks.failed;
        let task_template_ids = tasks.ids;

        for asset in &assets {
            report.assets_seen += 1;
            match self
                .process_asset(rule, asset, &categories, &task_template_ids, begin_date)
                .await
            {
                Ok(AssetOutcome::AlreadyScheduled { .. }) => report.recurrents_existing += 1,
                Ok(AssetOutcome::Scheduled {
                    template_created,
                    directives_failed,
                    ..
                }) => {
                    report.recurrents_created += 1;
                    report.directives_failed += directives_failed;
                    if template_created {
                        report.templates_created += 1;
                    } else {
                        report.templates_reused += 1;
                    }
                }
                Err(e) => {
                    error!(asset_id = asset.id, serial = %asset.serial_tag, error = %e, "处理资产失败，跳过该资产");
                    report.assets_failed += 1;
                }
            }
        }
    }

    /// 工单分类与任务分类都必须解析成功
    pub async fn resolve_rule_categories(
        &self,
        rule: &MaintenanceRule,
    ) -> SyncResult<RuleCategories> {
        let incident = self
            .resolver
            .category(
                CategoryKind::Incident,
                &rule.category_name,
                self.settings.incident_root_category_id,
            )
            .await;
        let task = self
            .resolver
            .category(
                CategoryKind::Task,
                &rule.category_name,
                self.settings.task_root_category_id,
            )
            .await;

        Ok(RuleCategories {
            incident_category_id: incident?.id,
            task_category_id: task?.id,
        })
    }

    /// 按任务列表顺序解析任务模板，失败的任务被省略
    pub async fn resolve_task_templates(
        &self,
        rule: &MaintenanceRule,
        task_category_id: i64,
    ) -> ResolvedTasks {
        let mut tasks = ResolvedTasks {
            ids: Vec::with_capacity(rule.task_descriptions.len()),
            failed: 0,
        };
        for task in &rule.task_descriptions {
            match self
                .resolver
                .task_template(&rule.category_name, task, task_category_id)
                .await
            {
                Ok(resolved) => tasks.ids.push(resolved.id),
                Err(e) => {
                    warn!(task = %task, error = %e, "解析任务模板失败，跳过该任务");
                    tasks.failed += 1;
                }
            }
        }
        tasks
    }

    pub async fn process_asset(
        &self,
        rule: &MaintenanceRule,
        asset: &Asset,
        categories: &RuleCategories,
        task_template_ids: &[i64],
        begin_date: NaiveDateTime,
    ) -> SyncResult<AssetOutcome> {
        let recurrent_name = naming::recurrent_ticket_name(&rule.category_name, &asset.serial_tag);
        if let Some(recurrent_id) = self.repository.find_recurrent_ticket(&recurrent_name).await? {
            debug!(name = %recurrent_name, recurrent_id, "周期工单已存在");
            return Ok(AssetOutcome::AlreadyScheduled { recurrent_id });
        }

        let template = self
            .resolver
            .ticket_template(
                &rule.category_name,
                &asset.entity_name,
                &asset.serial_tag,
                asset.entity_id,
            )
            .await?;

        let mut directives_failed = 0;
        if template.created {
            let directives = stamping::template_directives(
                &self.settings,
                rule,
                asset,
                categories.incident_category_id,
                task_template_ids,
            );
            let stamped =
                stamping::stamp_ticket_template(self.repository.as_ref(), template.id, &directives)
                    .await;
            directives_failed = stamped.failed;
        }

        let ticket = RecurrentTicket {
            name: recurrent_name,
            entity_id: asset.entity_id,
            active: true,
            template_id: template.id,
            begin_date,
            periodicity: rule.periodicity,
            calendar_id: self.settings.calendar_id,
            next_creation_date: begin_date,
        };
        let recurrent_id = self.repository.insert_recurrent_ticket(&ticket).await?;
        info!(name = %ticket.name, recurrent_id, template_id = template.id, "已创建周期工单");

        Ok(AssetOutcome::Scheduled {
            template_id: template.id,
            template_created: template.created,
            directives_failed,
            recurrent_id,
        })
    }
}

fn log_fallback(occurrence: &Occurrence) {
    match occurrence.fallback {
        Some(DayFallback::InvalidDay { requested }) => {
            warn!(requested, at = %occurrence.at, "起始日无效，使用 1 号");
        }
        Some(DayFallback::MonthEnd { requested, used }) => {
            warn!(requested, used, at = %occurrence.at, "目标月份没有该日，使用月末");
        }
        None => debug!(at = %occurrence.at, "下次开始时间"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_parsing() {
        assert_eq!("all".parse::<RunPhase>().unwrap(), RunPhase::All);
        assert_eq!("SYNC".parse::<RunPhase>().unwrap(), RunPhase::Sync);
        assert_eq!("create".parse::<RunPhase>().unwrap(), RunPhase::Create);
        assert!("both".parse::<RunPhase>().is_err());
    }

    #[test]
    fn test_phase_includes() {
        assert!(RunPhase::All.includes_sync() && RunPhase::All.includes_create());
        assert!(RunPhase::Sync.includes_sync() && !RunPhase::Sync.includes_create());
        assert!(!RunPhase::Create.includes_sync() && RunPhase::Create.includes_create());
        assert_eq!(RunPhase::Create.to_string(), "create");
    }
}
