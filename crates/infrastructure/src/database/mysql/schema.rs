//! GLPI 表结构绑定
//!
//! 每种实体对应的表名与列名在编译期固定，语句构造不接受外部传入的标识符。

use chrono::NaiveDateTime;
use preventive_domain::{CategoryKind, EntityKey, EntityRecord, FieldDirective, RecurrentTicket};

use crate::database::store::SqlParam;

pub const TASK_TEMPLATES_TABLE: &str = "glpi_tasktemplates";
pub const TICKET_TEMPLATES_TABLE: &str = "glpi_tickettemplates";
pub const RECURRENTS_TABLE: &str = "glpi_ticketrecurrents";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTable {
    pub table: &'static str,
    pub parent_column: &'static str,
}

pub fn category_table(kind: CategoryKind) -> CategoryTable {
    match kind {
        CategoryKind::Incident => CategoryTable {
            table: "glpi_itilcategories",
            parent_column: "itilcategories_id",
        },
        CategoryKind::Task => CategoryTable {
            table: "glpi_taskcategories",
            parent_column: "taskcategories_id",
        },
    }
}

fn category_extra_fields(kind: CategoryKind) -> Vec<(&'static str, SqlParam)> {
    match kind {
        CategoryKind::Incident => vec![
            ("is_helpdeskvisible", SqlParam::Int(0)),
            ("is_request", SqlParam::Int(1)),
        ],
        CategoryKind::Task => vec![("is_active", SqlParam::Int(1))],
    }
}

pub const SELECT_RULES: &str = r#"
    SELECT
        CAST(categoria_id AS SIGNED) AS categoria_id,
        categoria_name,
        tarefas,
        CAST(periodo AS SIGNED) AS periodo
    FROM preventivas
"#;

/// states_id = 1 为在用
pub const SELECT_ACTIVE_ASSETS: &str = r#"
    SELECT
        CAST(b.id AS SIGNED) AS id,
        CAST(b.entities_id AS SIGNED) AS entities_id,
        b.otherserial,
        CAST(b.states_id AS SIGNED) AS states_id,
        b.name AS bem_name,
        e.name AS entity_name
    FROM glpi_plugin_genericobject_gerals AS b
    JOIN glpi_entities AS e ON b.entities_id = e.id
    WHERE
        b.plugin_genericobject_geralcategories_id = ?
        AND b.states_id = 1
"#;

pub const DEACTIVATE_RECURRENTS: &str = r#"
    UPDATE glpi_ticketrecurrents r
    JOIN glpi_plugin_genericobject_gerals g ON g.otherserial = SUBSTRING_INDEX(r.name, 'PL:', -1)
    SET r.is_active = 0
    WHERE g.states_id != 1 AND r.is_active = 1
"#;

pub const REACTIVATE_RECURRENTS: &str = r#"
    UPDATE glpi_ticketrecurrents r
    JOIN glpi_plugin_genericobject_gerals g ON g.otherserial = SUBSTRING_INDEX(r.name, 'PL:', -1)
    SET r.is_active = 1
    WHERE g.states_id = 1 AND r.is_active = 0
"#;

pub const SELECT_RECURRENT_BY_NAME: &str =
    "SELECT CAST(id AS SIGNED) AS id FROM glpi_ticketrecurrents WHERE name = ?";

pub fn build_insert(table: &str, fields: &[(&'static str, SqlParam)]) -> (String, Vec<SqlParam>) {
    let columns = fields
        .iter()
        .map(|(column, _)| *column)
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; fields.len()].join(", ");
    let params = fields.iter().map(|(_, value)| value.clone()).collect();

    (
        format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})"),
        params,
    )
}

pub fn lookup_statement(key: &EntityKey) -> (String, Vec<SqlParam>) {
    match key {
        EntityKey::Category {
            kind,
            name,
            parent_id,
        } => {
            let binding = category_table(*kind);
            (
                format!(
                    "SELECT CAST(id AS SIGNED) AS id FROM {} WHERE name = ? AND {} = ?",
                    binding.table, binding.parent_column
                ),
                vec![name.as_str().into(), (*parent_id).into()],
            )
        }
        EntityKey::TaskTemplate { name, content } => (
            format!(
                "SELECT CAST(id AS SIGNED) AS id FROM {TASK_TEMPLATES_TABLE} WHERE name = ? AND content = ?"
            ),
            vec![name.as_str().into(), content.as_str().into()],
        ),
        EntityKey::TicketTemplate { name, entity_id } => (
            format!(
                "SELECT CAST(id AS SIGNED) AS id FROM {TICKET_TEMPLATES_TABLE} WHERE name = ? AND entities_id = ?"
            ),
            vec![name.as_str().into(), (*entity_id).into()],
        ),
    }
}

pub fn category_path_statement(kind: CategoryKind) -> String {
    format!(
        "SELECT completename FROM {} WHERE id = ?",
        category_table(kind).table
    )
}

pub fn insert_statement(record: &EntityRecord, now: NaiveDateTime) -> (String, Vec<SqlParam>) {
    match record {
        EntityRecord::Category(category) => {
            let binding = category_table(category.kind);
            let mut fields: Vec<(&'static str, SqlParam)> = vec![
                ("entities_id", SqlParam::Int(0)),
                ("is_recursive", SqlParam::Int(1)),
                ("name", category.name.as_str().into()),
                ("completename", category.full_path_name.as_str().into()),
                ("level", category.level.into()),
                ("date_mod", now.into()),
                ("date_creation", now.into()),
                (binding.parent_column, category.parent_id.into()),
            ];
            fields.extend(category_extra_fields(category.kind));
            build_insert(binding.table, &fields)
        }
        EntityRecord::TaskTemplate(template) => build_insert(
            TASK_TEMPLATES_TABLE,
            &[
                ("entities_id", SqlParam::Int(0)),
                ("is_recursive", SqlParam::Int(1)),
                ("name", template.name.as_str().into()),
                ("content", template.content.as_str().into()),
                ("taskcategories_id", template.task_category_id.into()),
                ("date_mod", now.into()),
                ("date_creation", now.into()),
                ("state", SqlParam::Int(1)),
                ("users_id_tech", SqlParam::Int(0)),
            ],
        ),
        EntityRecord::TicketTemplate(template) => build_insert(
            TICKET_TEMPLATES_TABLE,
            &[
                ("name", template.name.as_str().into()),
                ("entities_id", template.entity_id.into()),
            ],
        ),
    }
}

pub fn directive_statement(template_id: i64, directive: &FieldDirective) -> (String, Vec<SqlParam>) {
    match directive {
        FieldDirective::Hidden { num } => build_insert(
            "glpi_tickettemplatehiddenfields",
            &[("tickettemplates_id", template_id.into()), ("num", (*num).into())],
        ),
        FieldDirective::Mandatory { num } => build_insert(
            "glpi_tickettemplatemandatoryfields",
            &[("tickettemplates_id", template_id.into()), ("num", (*num).into())],
        ),
        FieldDirective::Predefined { num, value } => build_insert(
            "glpi_tickettemplatepredefinedfields",
            &[
                ("tickettemplates_id", template_id.into()),
                ("num", (*num).into()),
                ("value", value.as_str().into()),
            ],
        ),
    }
}

pub fn recurrent_statement(ticket: &RecurrentTicket) -> (String, Vec<SqlParam>) {
    build_insert(
        RECURRENTS_TABLE,
        &[
            ("name", ticket.name.as_str().into()),
            ("entities_id", ticket.entity_id.into()),
            ("is_active", ticket.active.into()),
            ("tickettemplates_id", ticket.template_id.into()),
            ("begin_date", ticket.begin_date.into()),
            ("periodicity", ticket.periodicity.into()),
            ("calendars_id", ticket.calendar_id.into()),
            ("next_creation_date", ticket.next_creation_date.into()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use preventive_domain::{NewCategory, TicketTemplateDraft};

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 1)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap()
    }

    #[test]
    fn test_build_insert_placeholders() {
        let (sql, params) = build_insert(
            "glpi_tickettemplates",
            &[("name", "X".into()), ("entities_id", 3_i64.into())],
        );
        assert_eq!(
            sql,
            "INSERT INTO glpi_tickettemplates (name, entities_id) VALUES (?, ?)"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_category_lookup_uses_flavor_parent_column() {
        let key = EntityKey::Category {
            kind: CategoryKind::Task,
            name: "Climatização".to_string(),
            parent_id: 41,
        };
        let (sql, params) = lookup_statement(&key);
        assert!(sql.contains("FROM glpi_taskcategories"));
        assert!(sql.contains("taskcategories_id = ?"));
        assert_eq!(
            params,
            vec![SqlParam::Text("Climatização".to_string()), SqlParam::Int(41)]
        );
    }

    #[test]
    fn test_incident_category_insert_carries_extras() {
        let record = EntityRecord::Category(NewCategory {
            kind: CategoryKind::Incident,
            name: "Climatização".to_string(),
            parent_id: 40,
            level: 2,
            full_path_name: "Preventivas > Climatização".to_string(),
        });
        let (sql, params) = insert_statement(&record, at());
        assert!(sql.starts_with("INSERT INTO glpi_itilcategories ("));
        assert!(sql.contains("itilcategories_id"));
        assert!(sql.contains("is_helpdeskvisible"));
        assert!(sql.contains("is_request"));
        assert!(!sql.contains("is_active"));
        assert_eq!(params.len(), 10);
        assert!(params.contains(&SqlParam::Text("Preventivas > Climatização".to_string())));
    }

    #[test]
    fn test_task_category_insert_is_active() {
        let record = EntityRecord::Category(NewCategory {
            kind: CategoryKind::Task,
            name: "Climatização".to_string(),
            parent_id: 41,
            level: 2,
            full_path_name: " > Climatização".to_string(),
        });
        let (sql, _) = insert_statement(&record, at());
        assert!(sql.starts_with("INSERT INTO glpi_taskcategories ("));
        assert!(sql.contains("is_active"));
    }

    #[test]
    fn test_ticket_template_insert() {
        let record = EntityRecord::TicketTemplate(TicketTemplateDraft {
            name: "Preventiva - A - Loja - PL:1".to_string(),
            entity_id: 7,
        });
        let (sql, params) = insert_statement(&record, at());
        assert_eq!(
            sql,
            "INSERT INTO glpi_tickettemplates (name, entities_id) VALUES (?, ?)"
        );
        assert_eq!(params[1], SqlParam::Int(7));
    }

    #[test]
    fn test_directive_tables() {
        let (sql, _) = directive_statement(9, &FieldDirective::Hidden { num: 3 });
        assert!(sql.contains("glpi_tickettemplatehiddenfields"));
        let (sql, _) = directive_statement(9, &FieldDirective::Mandatory { num: 3 });
        assert!(sql.contains("glpi_tickettemplatemandatoryfields"));
        let (sql, params) = directive_statement(
            9,
            &FieldDirective::Predefined {
                num: 175,
                value: "12".to_string(),
            },
        );
        assert!(sql.contains("glpi_tickettemplatepredefinedfields"));
        assert_eq!(
            params,
            vec![SqlParam::Int(9), SqlParam::Int(175), SqlParam::Text("12".to_string())]
        );
    }

    #[test]
    fn test_recurrent_statement() {
        let ticket = RecurrentTicket {
            name: "Preventiva - A - PL:PL100".to_string(),
            entity_id: 2,
            active: true,
            template_id: 5,
            begin_date: at(),
            periodicity: 2_592_000,
            calendar_id: 1,
            next_creation_date: at(),
        };
        let (sql, params) = recurrent_statement(&ticket);
        assert!(sql.starts_with("INSERT INTO glpi_ticketrecurrents (name, entities_id, is_active"));
        assert_eq!(params[2], SqlParam::Int(1));
        assert_eq!(params[4], SqlParam::DateTime(at()));
        assert_eq!(params[7], SqlParam::DateTime(at()));
    }
}
