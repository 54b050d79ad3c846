use serde::Serialize;
use uuid::Uuid;

use crate::engine::RunPhase;

/// 状态同步阶段结果，某条语句失败时对应字段为 None
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSyncReport {
    pub deactivated: Option<u64>,
    pub reactivated: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CreationReport {
    /// 规则列表读取失败，本阶段未处理任何规则
    pub rules_unavailable: bool,
    pub rules_seen: usize,
    /// 没有在用资产的规则
    pub rules_skipped: usize,
    /// 读取资产或解析分类失败的规则
    pub rules_failed: usize,
    pub assets_seen: usize,
    pub recurrents_existing: usize,
    pub recurrents_created: usize,
    pub templates_created: usize,
    pub templates_reused: usize,
    pub task_templates_resolved: usize,
    /// 解析失败而被省略的任务模板
    pub task_templates_failed: usize,
    pub directives_failed: usize,
    pub assets_failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub phase: RunPhase,
    pub status: Option<StatusSyncReport>,
    pub creation: Option<CreationReport>,
}

impl RunReport {
    /// 存在任何被跳过或失败的单元
    pub fn is_degraded(&self) -> bool {
        let status_failed = self
            .status
            .is_some_and(|s| s.deactivated.is_none() || s.reactivated.is_none());
        let creation_failed = self.creation.is_some_and(|c| {
            c.rules_unavailable
                || c.rules_failed > 0
                || c.task_templates_failed > 0
                || c.assets_failed > 0
                || c.directives_failed > 0
        });
        status_failed || creation_failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(creation: CreationReport) -> RunReport {
        RunReport {
            run_id: Uuid::new_v4(),
            phase: RunPhase::Create,
            status: None,
            creation: Some(creation),
        }
    }

    #[test]
    fn test_clean_run_is_not_degraded() {
        let creation = CreationReport {
            rules_seen: 2,
            rules_skipped: 1,
            recurrents_created: 3,
            ..CreationReport::default()
        };
        assert!(!report(creation).is_degraded());
    }

    #[test]
    fn test_every_failure_counter_degrades() {
        let failures = [
            CreationReport {
                rules_unavailable: true,
                ..CreationReport::default()
            },
            CreationReport {
                rules_failed: 1,
                ..CreationReport::default()
            },
            CreationReport {
                task_templates_failed: 1,
                ..CreationReport::default()
            },
            CreationReport {
                assets_failed: 1,
                ..CreationReport::default()
            },
            CreationReport {
                directives_failed: 1,
                ..CreationReport::default()
            },
        ];
        for creation in failures {
            assert!(report(creation).is_degraded(), "{creation:?}");
        }
    }

    #[test]
    fn test_failed_status_statement_degrades() {
        let run = RunReport {
            run_id: Uuid::new_v4(),
            phase: RunPhase::Sync,
            status: Some(StatusSyncReport {
                deactivated: Some(2),
                reactivated: None,
            }),
            creation: None,
        };
        assert!(run.is_degraded());
    }
}
