use std::collections::BTreeSet;

use crate::schema::Schema;

/// Return a copy of `schema` without the tables named in `exclude`.
///
/// Matching is exact and case-sensitive on the bare table name, so an
/// excluded name removes that table from every schema it appears in.
pub fn filter_tables<S: AsRef<str>>(schema: &Schema, exclude: &[S]) -> Schema {
    let excluded: BTreeSet<&str> = exclude.iter().map(AsRef::as_ref).collect();

    Schema {
        tables: schema
            .tables
            .iter()
            .filter(|table| !excluded.contains(table.name.as_str()))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Table;

    fn sample() -> Schema {
        Schema {
            tables: vec![
                Table::new("public", "users"),
                Table::new("public", "posts"),
                Table::new("public", "comments"),
                Table::new("audit", "posts"),
            ],
        }
    }

    #[test]
    fn removes_excluded_tables_and_keeps_order() {
        let schema = sample();
        let filtered = filter_tables(&schema, &["comments"]);
        let names: Vec<String> = filtered.tables.iter().map(Table::qualified_name).collect();
        assert_eq!(names, vec!["users", "posts", "audit.posts"]);
    }

    #[test]
    fn original_schema_is_untouched() {
        let schema = sample();
        let before = schema.clone();
        let filtered = filter_tables(&schema, &["users", "posts"]);

        assert_eq!(schema, before);
        let removed = schema.tables.len() - filtered.tables.len();
        assert_eq!(removed, 3);
        assert_eq!(filtered.tables.len() + removed, schema.tables.len());
    }

    #[test]
    fn same_name_in_other_schemas_is_removed_too() {
        let filtered = filter_tables(&sample(), &["posts"]);
        assert!(filtered.tables.iter().all(|table| table.name != "posts"));
    }

    #[test]
    fn matching_is_case_sensitive_and_literal() {
        let schema = sample();
        assert_eq!(filter_tables(&schema, &["Users"]).tables.len(), 4);
        assert_eq!(filter_tables(&schema, &["post*"]).tables.len(), 4);
    }

    #[test]
    fn empty_inputs_are_valid() {
        let empty = Schema::default();
        assert!(filter_tables(&empty, &["users"]).tables.is_empty());
        let none: [&str; 0] = [];
        assert_eq!(filter_tables(&sample(), &none), sample());
    }
}
