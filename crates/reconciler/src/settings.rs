use preventive_config::{AppConfig, FieldList};
use preventive_domain::value_objects::ReconcileSettings;
use tracing::warn;

/// 将配置解析为运行设置，无效的字段编号与起始日只记录警告
pub fn settings_from_config(config: &AppConfig) -> ReconcileSettings {
    let glpi = &config.glpi;

    let start_day_of_month = match glpi.start_day_of_month.as_day_of_month() {
        Ok(day) => day,
        Err(raw) => {
            warn!(value = %raw, "start_day_of_month 无法解析，使用 1 号");
            1
        }
    };

    ReconcileSettings {
        incident_root_category_id: glpi.incident_root_category_id,
        task_root_category_id: glpi.task_root_category_id,
        hidden_fields: field_numbers(&glpi.hidden_fields, "glpi.hidden_fields"),
        mandatory_fields: field_numbers(&glpi.mandatory_fields, "glpi.mandatory_fields"),
        ticket_status_id: glpi.ticket_status_id,
        location_id: glpi.location_id,
        ticket_type_id: glpi.ticket_type_id,
        requester_user_id: glpi.requester_user_id,
        calendar_id: glpi.calendar_id,
        base_description: config.script.ticket_description.clone(),
        start_day_of_month,
    }
}

fn field_numbers(list: &FieldList, field: &str) -> Vec<i32> {
    let (numbers, rejected) = list.parse();
    for part in rejected {
        warn!(field, value = %part, "忽略无法解析的字段编号");
    }
    numbers
}

#[cfg(test)]
mod tests {
    use super::*;
    use preventive_config::LenientNumber;

    #[test]
    fn test_settings_from_default_config() {
        let settings = settings_from_config(&AppConfig::default());
        assert_eq!(settings.start_day_of_month, 1);
        assert!(settings.hidden_fields.is_empty());
        assert_eq!(settings.base_description, "");
    }

    #[test]
    fn test_comma_separated_fields_skip_garbage() {
        let mut config = AppConfig::default();
        config.glpi.hidden_fields = FieldList::Text("3, x, 17,,40".to_string());
        config.glpi.mandatory_fields = FieldList::Numbers(vec![21, 7]);
        let settings = settings_from_config(&config);
        assert_eq!(settings.hidden_fields, vec![3, 17, 40]);
        assert_eq!(settings.mandatory_fields, vec![21, 7]);
    }

    #[test]
    fn test_unparsable_start_day_defaults_to_first() {
        let mut config = AppConfig::default();
        config.glpi.start_day_of_month = LenientNumber::Text("quinze".to_string());
        assert_eq!(settings_from_config(&config).start_day_of_month, 1);

        config.glpi.start_day_of_month = LenientNumber::Text(" 15 ".to_string());
        assert_eq!(settings_from_config(&config).start_day_of_month, 15);
    }

    #[test]
    fn test_out_of_range_start_day_is_kept() {
        // 超出范围的日期在计算下次时间时才回退
        let mut config = AppConfig::default();
        config.glpi.start_day_of_month = LenientNumber::Number(45);
        assert_eq!(settings_from_config(&config).start_day_of_month, 45);
    }
}
