use crate::validation::{ConfigValidator, ValidationUtils};
use serde::{Deserialize, Serialize};

/// 字段编号列表，既接受 TOML 数组也接受逗号分隔的字符串（如 "1,2,3"）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldList {
    Numbers(Vec<i64>),
    Text(String),
    Single(i64),
}

impl Default for FieldList {
    fn default() -> Self {
        FieldList::Numbers(Vec::new())
    }
}

impl FieldList {
    /// 返回 (有效的字段编号, 无法解析的片段)
    pub fn parse(&self) -> (Vec<i32>, Vec<String>) {
        let mut numbers = Vec::new();
        let mut rejected = Vec::new();

        match self {
            FieldList::Numbers(values) => {
                for value in values {
                    match i32::try_from(*value) {
                        Ok(num) => numbers.push(num),
                        Err(_) => rejected.push(value.to_string()),
                    }
                }
            }
            FieldList::Single(value) => match i32::try_from(*value) {
                Ok(num) => numbers.push(num),
                Err(_) => rejected.push(value.to_string()),
            },
            FieldList::Text(raw) => {
                for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    match part.parse::<i32>() {
                        Ok(num) => numbers.push(num),
                        Err(_) => rejected.push(part.to_string()),
                    }
                }
            }
        }

        (numbers, rejected)
    }
}

/// 宽松数值：保留原始输入，由使用方决定如何回退
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LenientNumber {
    Number(i64),
    Text(String),
}

impl LenientNumber {
    /// 解析为月份中的日期，失败时返回原始文本
    pub fn as_day_of_month(&self) -> Result<u32, String> {
        match self {
            LenientNumber::Number(n) => u32::try_from(*n).map_err(|_| n.to_string()),
            LenientNumber::Text(raw) => raw.trim().parse::<u32>().map_err(|_| raw.clone()),
        }
    }
}

impl Default for LenientNumber {
    fn default() -> Self {
        LenientNumber::Number(1)
    }
}

/// GLPI 目标库中的固定标识与模板默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlpiConfig {
    pub incident_root_category_id: i64,
    pub task_root_category_id: i64,
    #[serde(default)]
    pub hidden_fields: FieldList,
    #[serde(default)]
    pub mandatory_fields: FieldList,
    pub ticket_status_id: i64,
    pub location_id: i64,
    pub ticket_type_id: i64,
    pub requester_user_id: i64,
    pub calendar_id: i64,
    #[serde(default)]
    pub start_day_of_month: LenientNumber,
}

impl Default for GlpiConfig {
    fn default() -> Self {
        Self {
            incident_root_category_id: 1,
            task_root_category_id: 1,
            hidden_fields: FieldList::default(),
            mandatory_fields: FieldList::default(),
            ticket_status_id: 1,
            location_id: 0,
            ticket_type_id: 2,
            requester_user_id: 0,
            calendar_id: 0,
            start_day_of_month: LenientNumber::default(),
        }
    }
}

impl ConfigValidator for GlpiConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        ValidationUtils::validate_row_id(
            self.incident_root_category_id,
            "glpi.incident_root_category_id",
        )?;
        ValidationUtils::validate_row_id(self.task_root_category_id, "glpi.task_root_category_id")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptConfig {
    /// 模板描述字段的基础文本，资产名称会拼接在其前面
    #[serde(default)]
    pub ticket_description: String,
}
