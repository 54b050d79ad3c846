use serde::{Deserialize, Serialize};

/// 工单模板字段编号
pub mod ticket_fields {
    pub const TITLE: i32 = 1;
    pub const REQUESTER: i32 = 4;
    pub const CATEGORY: i32 = 7;
    pub const STATUS: i32 = 12;
    pub const LINKED_ITEM: i32 = 13;
    pub const TYPE: i32 = 14;
    pub const DESCRIPTION: i32 = 21;
    pub const LOCATION: i32 = 83;
    /// 任务模板字段，每个任务模板一条
    pub const TASK_TEMPLATE: i32 = 175;
}

/// 新建分类所在的层级（根分类之下一级）
pub const CATEGORY_LEVEL: i32 = 2;

/// 一次运行的只读设置，启动前从配置解析一次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileSettings {
    pub incident_root_category_id: i64,
    pub task_root_category_id: i64,
    pub hidden_fields: Vec<i32>,
    pub mandatory_fields: Vec<i32>,
    pub ticket_status_id: i64,
    pub location_id: i64,
    pub ticket_type_id: i64,
    pub requester_user_id: i64,
    pub calendar_id: i64,
    pub base_description: String,
    pub start_day_of_month: u32,
}
