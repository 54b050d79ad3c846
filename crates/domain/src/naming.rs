//! 由规则与资产组合出的稳定名称
//!
//! 每个创建步骤都以这些名称作为自然键，重复运行时据此判断实体是否已存在。

/// 资产标签在名称中的前缀
pub const SERIAL_TAG_MARKER: &str = "PL:";

/// 周期工单名称，同时也是工单模板预设的标题
pub fn recurrent_ticket_name(category_name: &str, serial_tag: &str) -> String {
    format!("Preventiva - {category_name} - {SERIAL_TAG_MARKER}{serial_tag}")
}

pub fn ticket_template_name(category_name: &str, entity_name: &str, serial_tag: &str) -> String {
    format!("Preventiva - {category_name} - {entity_name} - {SERIAL_TAG_MARKER}{serial_tag}")
}

pub fn task_template_name(category_name: &str) -> String {
    format!("Tarefa - {category_name}")
}

/// 取名称中最后一个 "PL:" 之后的文本
pub fn serial_tag_from_name(name: &str) -> &str {
    match name.rsplit_once(SERIAL_TAG_MARKER) {
        Some((_, tag)) => tag,
        None => name,
    }
}

pub fn asset_link_reference(asset_id: i64) -> String {
    format!("PluginGenericobjectGeral_{asset_id}")
}

pub fn asset_description(asset_name: &str, base_description: &str) -> String {
    format!("Bem:{asset_name}\n\n{base_description}")
}

pub fn category_full_path(parent_path: &str, name: &str) -> String {
    format!("{parent_path} > {name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recurrent_ticket_name() {
        assert_eq!(
            recurrent_ticket_name("Ar Condicionado", "PL100"),
            "Preventiva - Ar Condicionado - PL:PL100"
        );
    }

    #[test]
    fn test_ticket_template_name_embeds_entity() {
        assert_eq!(
            ticket_template_name("Ar Condicionado", "Loja 07", "PL100"),
            "Preventiva - Ar Condicionado - Loja 07 - PL:PL100"
        );
    }

    #[test]
    fn test_serial_tag_from_name_uses_last_marker() {
        assert_eq!(serial_tag_from_name("Preventiva - X - PL:PL100"), "PL100");
        assert_eq!(serial_tag_from_name("Preventiva - PL:A - PL:B7"), "B7");
        assert_eq!(serial_tag_from_name("sem marcador"), "sem marcador");
    }

    #[test]
    fn test_category_full_path_with_missing_parent() {
        assert_eq!(category_full_path("", "Elétrica"), " > Elétrica");
        assert_eq!(
            category_full_path("Preventivas", "Elétrica"),
            "Preventivas > Elétrica"
        );
    }

    #[test]
    fn test_asset_description() {
        assert_eq!(
            asset_description("Gerador 2", "Verificar óleo."),
            "Bem:Gerador 2\n\nVerificar óleo."
        );
    }
}
