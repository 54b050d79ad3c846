//! 预防性维护协调
//!
//! 引擎只依赖 [`MaintenanceRepository`]，由调用方注入具体存储。

pub mod engine;
pub mod recurrence;
pub mod report;
pub mod resolver;
pub mod settings;
pub mod stamping;

pub use engine::{AssetOutcome, ReconciliationEngine, ResolvedTasks, RuleCategories, RunPhase};
pub use preventive_domain::repositories::MaintenanceRepository;
pub use recurrence::{DayFallback, Occurrence, RecurrenceScheduler};
pub use report::{CreationReport, RunReport, StatusSyncReport};
pub use resolver::{EntityResolver, Resolved};
pub use settings::settings_from_config;
pub use stamping::{stamp_ticket_template, template_directives, StampReport};
