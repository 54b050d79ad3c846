//! 工单模板字段写入
//!
//! 只在模板本次新建时执行。每条指令独立写入，单条失败只跳过该字段。

use preventive_domain::entities::{Asset, FieldDirective, MaintenanceRule};
use preventive_domain::naming;
use preventive_domain::repositories::MaintenanceRepository;
use preventive_domain::value_objects::{ticket_fields, ReconcileSettings};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StampReport {
    pub written: usize,
    pub failed: usize,
}

/// 生成写入顺序固定的指令列表：隐藏字段、必填字段、预设值
pub fn template_directives(
    settings: &ReconcileSettings,
    rule: &MaintenanceRule,
    asset: &Asset,
    incident_category_id: i64,
    task_template_ids: &[i64],
) -> Vec<FieldDirective> {
    let mut directives = Vec::with_capacity(
        settings.hidden_fields.len() + settings.mandatory_fields.len() + 8 + task_template_ids.len(),
    );

    directives.extend(
        settings
            .hidden_fields
            .iter()
            .map(|&num| FieldDirective::Hidden { num }),
    );
    directives.extend(
        settings
            .mandatory_fields
            .iter()
            .map(|&num| FieldDirective::Mandatory { num }),
    );

    let predefined = [
        (
            ticket_fields::TITLE,
            naming::recurrent_ticket_name(&rule.category_name, &asset.serial_tag),
        ),
        (ticket_fields::STATUS, settings.ticket_status_id.to_string()),
        (ticket_fields::LOCATION, settings.location_id.to_string()),
        (ticket_fields::TYPE, settings.ticket_type_id.to_string()),
        (ticket_fields::CATEGORY, incident_category_id.to_string()),
        (
            ticket_fields::DESCRIPTION,
            naming::asset_description(&asset.name, &settings.base_description),
        ),
        (ticket_fields::REQUESTER, settings.requester_user_id.to_string()),
        (ticket_fields::LINKED_ITEM, naming::asset_link_reference(asset.id)),
    ];
    directives.extend(
        predefined
            .into_iter()
            .map(|(num, value)| FieldDirective::Predefined { num, value }),
    );

    directives.extend(task_template_ids.iter().map(|id| FieldDirective::Predefined {
        num: ticket_fields::TASK_TEMPLATE,
        value: id.to_string(),
    }));

    directives
}

pub async fn stamp_ticket_template(
    repository: &dyn MaintenanceRepository,
    template_id: i64,
    directives: &[FieldDirective],
) -> StampReport {
    let mut report = StampReport::default();
    for directive in directives {
        match repository.insert_field_directive(template_id, directive).await {
            Ok(_) => report.written += 1,
            Err(e) => {
                warn!(template_id, num = directive.num(), error = %e, "写入模板字段失败，跳过该字段");
                report.failed += 1;
            }
        }
    }
    debug!(template_id, written = report.written, failed = report.failed, "模板字段写入完成");
    report
}
