//! Test data builders

use preventive_domain::entities::{Asset, MaintenanceRule, ACTIVE_STATUS_ID};
use preventive_domain::value_objects::ReconcileSettings;

pub const INCIDENT_ROOT_ID: i64 = 10;
pub const TASK_ROOT_ID: i64 = 20;

pub struct RuleBuilder {
    rule: MaintenanceRule,
}

impl RuleBuilder {
    pub fn new() -> Self {
        Self {
            rule: MaintenanceRule::new(5, "HVAC", "Check filters;Replace belt", 2_592_000),
        }
    }

    pub fn with_category_id(mut self, category_id: i64) -> Self {
        self.rule.category_id = category_id;
        self
    }

    pub fn with_category_name(mut self, name: &str) -> Self {
        self.rule.category_name = name.to_string();
        self
    }

    pub fn with_tasks(mut self, raw_tasks: &str) -> Self {
        self.rule.task_descriptions = MaintenanceRule::parse_task_list(raw_tasks);
        self
    }

    pub fn with_periodicity(mut self, periodicity: i64) -> Self {
        self.rule.periodicity = periodicity;
        self
    }

    pub fn build(self) -> MaintenanceRule {
        self.rule
    }
}

impl Default for RuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct AssetBuilder {
    asset: Asset,
}

impl AssetBuilder {
    pub fn new() -> Self {
        Self {
            asset: Asset {
                id: 42,
                entity_id: 3,
                entity_name: "Store A".to_string(),
                serial_tag: "PL100".to_string(),
                status_id: ACTIVE_STATUS_ID,
                name: "AC unit".to_string(),
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.asset.id = id;
        self
    }

    pub fn with_entity(mut self, entity_id: i64, entity_name: &str) -> Self {
        self.asset.entity_id = entity_id;
        self.asset.entity_name = entity_name.to_string();
        self
    }

    pub fn with_serial_tag(mut self, serial_tag: &str) -> Self {
        self.asset.serial_tag = serial_tag.to_string();
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.asset.name = name.to_string();
        self
    }

    pub fn with_status(mut self, status_id: i64) -> Self {
        self.asset.status_id = status_id;
        self
    }

    pub fn inactive(self) -> Self {
        self.with_status(ACTIVE_STATUS_ID + 1)
    }

    pub fn build(self) -> Asset {
        self.asset
    }
}

impl Default for AssetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 与内存存储中预置的根分类配套的设置
pub fn settings_fixture() -> ReconcileSettings {
    ReconcileSettings {
        incident_root_category_id: INCIDENT_ROOT_ID,
        task_root_category_id: TASK_ROOT_ID,
        hidden_fields: vec![3, 17],
        mandatory_fields: vec![21],
        ticket_status_id: 1,
        location_id: 4,
        ticket_type_id: 2,
        requester_user_id: 9,
        calendar_id: 1,
        base_description: "Executar checklist.".to_string(),
        start_day_of_month: 31,
    }
}
