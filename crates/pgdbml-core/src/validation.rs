use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::schema::Schema;

/// Validate internal consistency of an introspected schema.
///
/// This checks:
/// - duplicate `(schema, table)` pairs and duplicate columns
/// - `is_primary_key` agrees with the table's primary key list
/// - index and reference source columns exist on their table
pub fn validate_schema(schema: &Schema) -> Result<()> {
    let mut catalog: BTreeMap<(&str, &str), BTreeSet<&str>> = BTreeMap::new();

    for table in &schema.tables {
        let key = (table.schema.as_str(), table.name.as_str());
        if catalog.contains_key(&key) {
            return Err(Error::InvalidSchema(format!(
                "duplicate table name: {}.{}",
                table.schema, table.name
            )));
        }

        let mut columns = BTreeSet::new();
        for column in &table.columns {
            if !columns.insert(column.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate column name: {}.{}.{}",
                    table.schema, table.name, column.name
                )));
            }
        }

        catalog.insert(key, columns);
    }

    for table in &schema.tables {
        let Some(columns) = catalog.get(&(table.schema.as_str(), table.name.as_str())) else {
            continue;
        };

        for pk in &table.primary_keys {
            if !columns.contains(pk.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "primary key column not found: {}.{}.{}",
                    table.schema, table.name, pk
                )));
            }
        }

        for column in &table.columns {
            if column.is_primary_key != table.primary_keys.contains(&column.name) {
                return Err(Error::InvalidSchema(format!(
                    "primary key flag disagrees with key list: {}.{}.{}",
                    table.schema, table.name, column.name
                )));
            }
        }

        for index in &table.indexes {
            for column in &index.columns {
                if !columns.contains(column.as_str()) {
                    return Err(Error::InvalidSchema(format!(
                        "index column not found: {}.{}.{} ({})",
                        table.schema, table.name, column, index.name
                    )));
                }
            }
        }

        for reference in &table.references {
            if reference.from_columns.len() != reference.to_columns.len() {
                return Err(Error::InvalidSchema(format!(
                    "reference column count mismatch: {}.{} -> {}.{}",
                    table.schema, table.name, reference.to_schema, reference.to_table
                )));
            }
            for column in &reference.from_columns {
                if !columns.contains(column.as_str()) {
                    return Err(Error::InvalidSchema(format!(
                        "foreign key column not found: {}.{}.{}",
                        table.schema, table.name, column
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, Index, Reference, Table};

    fn users() -> Table {
        let mut id = Column::new("id", "int");
        id.nullable = false;
        id.is_primary_key = true;
        Table {
            columns: vec![id, Column::new("email", "text")],
            primary_keys: vec!["id".to_string()],
            ..Table::new("public", "users")
        }
    }

    #[test]
    fn accepts_consistent_schema() {
        let schema = Schema {
            tables: vec![users(), Table::new("auth", "users")],
        };
        assert!(validate_schema(&schema).is_ok());
    }

    #[test]
    fn rejects_duplicate_tables() {
        let schema = Schema {
            tables: vec![users(), users()],
        };
        let err = validate_schema(&schema).unwrap_err();
        assert!(err.to_string().contains("duplicate table name: public.users"));
    }

    #[test]
    fn rejects_primary_key_flag_mismatch() {
        let mut table = users();
        table.columns[1].is_primary_key = true;
        let err = validate_schema(&Schema { tables: vec![table] }).unwrap_err();
        assert!(err.to_string().contains("public.users.email"));
    }

    #[test]
    fn rejects_unknown_index_column() {
        let mut table = users();
        table.indexes.push(Index {
            name: "users_name_idx".to_string(),
            columns: vec!["name".to_string()],
            unique: false,
        });
        assert!(validate_schema(&Schema { tables: vec![table] }).is_err());
    }

    #[test]
    fn rejects_unknown_reference_column() {
        let mut table = users();
        table.references.push(Reference {
            from_schema: "public".to_string(),
            from_table: "users".to_string(),
            from_columns: vec!["org_id".to_string()],
            to_schema: "public".to_string(),
            to_table: "orgs".to_string(),
            to_columns: vec!["id".to_string()],
            ..Reference::default()
        });
        let err = validate_schema(&Schema { tables: vec![table] }).unwrap_err();
        assert!(err.to_string().contains("foreign key column not found"));
    }
}
