use std::fmt::Write;

use pgdbml_core::{Column, Index, Reference, Schema, Table, qualified_table_name};

/// Default-expression prefix used by sequence-backed (serial) columns.
pub const SEQUENCE_DEFAULT_PREFIX: &str = "nextval(";

/// Render `schema` as DBML.
///
/// Tables are emitted sorted by `(schema, name)`, columns by name and
/// indexes by name; all references follow in one separately sorted list.
/// The output depends only on the logical content of `schema`.
pub fn generate(schema: &Schema) -> String {
    let mut tables: Vec<&Table> = schema.tables.iter().collect();
    tables.sort_by(|left, right| {
        left.schema
            .cmp(&right.schema)
            .then_with(|| left.name.cmp(&right.name))
    });

    let mut out = String::new();
    for table in &tables {
        write_table(&mut out, table);
        out.push('\n');
    }

    let mut references: Vec<&Reference> = tables
        .iter()
        .flat_map(|table| table.references.iter())
        .collect();
    references.sort_by_cached_key(|reference| reference_sort_key(reference));

    for reference in references {
        write_reference(&mut out, reference);
    }

    out
}

/// [`generate`] as UTF-8 bytes, for file and stream consumers.
pub fn generate_bytes(schema: &Schema) -> Vec<u8> {
    generate(schema).into_bytes()
}

fn write_table(out: &mut String, table: &Table) {
    let _ = writeln!(out, "Table {} {{", table.qualified_name());

    let mut columns: Vec<&Column> = table.columns.iter().collect();
    columns.sort_by(|left, right| left.name.cmp(&right.name));
    for column in columns {
        write_column(out, column);
    }

    if !table.indexes.is_empty() {
        let mut indexes: Vec<&Index> = table.indexes.iter().collect();
        indexes.sort_by(|left, right| left.name.cmp(&right.name));

        out.push('\n');
        out.push_str("  indexes {\n");
        for index in indexes {
            let _ = writeln!(out, "    {}", index_line(index));
        }
        out.push_str("  }\n");
    }

    out.push_str("}\n");
}

fn write_column(out: &mut String, column: &Column) {
    let _ = write!(out, "  {} {}", column.name, column.data_type);

    let attributes = column_attributes(column);
    if !attributes.is_empty() {
        let _ = write!(out, " [{}]", attributes.join(", "));
    }
    out.push('\n');
}

/// Attribute list for a column line, in emission order.
pub fn column_attributes(column: &Column) -> Vec<String> {
    let mut attributes = Vec::new();

    if column.is_primary_key {
        attributes.push("pk".to_string());
    }
    if !column.nullable && !column.is_primary_key {
        attributes.push("not null".to_string());
    }
    if let Some(default) = &column.default {
        if is_sequence_default(default) {
            attributes.push("increment".to_string());
        } else {
            attributes.push(format!("default: `{default}`"));
        }
    }

    attributes
}

/// Whether a default expression comes from a sequence (auto-increment).
pub fn is_sequence_default(expression: &str) -> bool {
    expression.starts_with(SEQUENCE_DEFAULT_PREFIX)
}

fn index_line(index: &Index) -> String {
    let columns = if index.columns.len() == 1 && !index.unique {
        index.columns[0].clone()
    } else {
        format!("({})", index.columns.join(", "))
    };

    if index.unique {
        format!("{columns} [unique]")
    } else {
        columns
    }
}

fn column_ref(table: &str, columns: &[String]) -> String {
    match columns {
        [single] => format!("{table}.{single}"),
        _ => format!("{table}.({})", columns.join(", ")),
    }
}

type ReferenceSortKey = (String, String, String, String, Vec<String>, Vec<String>);

/// Qualified source table, first source column, qualified target table,
/// first target column; full column lists break remaining ties.
fn reference_sort_key(reference: &Reference) -> ReferenceSortKey {
    (
        qualified_table_name(&reference.from_schema, &reference.from_table),
        reference.from_columns.first().cloned().unwrap_or_default(),
        qualified_table_name(&reference.to_schema, &reference.to_table),
        reference.to_columns.first().cloned().unwrap_or_default(),
        reference.from_columns.clone(),
        reference.to_columns.clone(),
    )
}

fn write_reference(out: &mut String, reference: &Reference) {
    let source = column_ref(
        &qualified_table_name(&reference.from_schema, &reference.from_table),
        &reference.from_columns,
    );
    let target = column_ref(
        &qualified_table_name(&reference.to_schema, &reference.to_table),
        &reference.to_columns,
    );
    let _ = write!(out, "Ref: {source} > {target}");

    let mut attributes = Vec::new();
    if !reference.on_delete.is_no_action() {
        attributes.push(format!("delete: {}", reference.on_delete.as_dbml()));
    }
    if !reference.on_update.is_no_action() {
        attributes.push(format!("update: {}", reference.on_update.as_dbml()));
    }
    if !attributes.is_empty() {
        let _ = write!(out, " [{}]", attributes.join(", "));
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use pgdbml_core::ReferentialAction;

    use super::*;

    fn column(name: &str, nullable: bool, pk: bool, default: Option<&str>) -> Column {
        Column {
            name: name.to_string(),
            data_type: "int".to_string(),
            nullable,
            default: default.map(str::to_string),
            is_primary_key: pk,
        }
    }

    fn index(columns: &[&str], unique: bool) -> Index {
        Index {
            name: "idx".to_string(),
            columns: columns.iter().map(|column| column.to_string()).collect(),
            unique,
        }
    }

    #[test]
    fn primary_key_columns_skip_not_null() {
        assert_eq!(column_attributes(&column("id", false, true, None)), vec!["pk"]);
        assert_eq!(
            column_attributes(&column("user_id", false, false, None)),
            vec!["not null"]
        );
        assert!(column_attributes(&column("name", true, false, None)).is_empty());
    }

    #[test]
    fn sequence_defaults_render_as_increment() {
        let serial = column("id", false, true, Some("nextval('users_id_seq'::regclass)"));
        assert_eq!(column_attributes(&serial), vec!["pk", "increment"]);

        let stamped = column("created_at", false, false, Some("now()"));
        assert_eq!(
            column_attributes(&stamped),
            vec!["not null", "default: `now()`"]
        );
        assert!(!is_sequence_default("'nextval('::text"));
    }

    #[test]
    fn index_lines_follow_uniqueness_and_arity() {
        assert_eq!(index_line(&index(&["email"], false)), "email");
        assert_eq!(index_line(&index(&["email"], true)), "(email) [unique]");
        assert_eq!(index_line(&index(&["org_id", "email"], false)), "(org_id, email)");
        assert_eq!(
            index_line(&index(&["org_id", "email"], true)),
            "(org_id, email) [unique]"
        );
    }

    #[test]
    fn composite_references_use_column_lists() {
        let reference = Reference {
            from_schema: "app".to_string(),
            from_table: "memberships".to_string(),
            from_columns: vec!["org_id".to_string(), "user_id".to_string()],
            to_schema: "public".to_string(),
            to_table: "org_users".to_string(),
            to_columns: vec!["org_id".to_string(), "id".to_string()],
            on_delete: ReferentialAction::NoAction,
            on_update: ReferentialAction::SetNull,
        };

        let mut out = String::new();
        write_reference(&mut out, &reference);
        assert_eq!(
            out,
            "Ref: app.memberships.(org_id, user_id) > org_users.(org_id, id) [update: set null]\n"
        );
    }

    #[test]
    fn empty_schema_renders_nothing() {
        assert_eq!(generate(&Schema::default()), "");
        assert!(generate_bytes(&Schema::default()).is_empty());
    }
}
