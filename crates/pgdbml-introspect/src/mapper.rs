use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use pgdbml_core::{Column, Index, Reference, ReferenceKey, ReferentialAction};

use crate::catalog::{ColumnRow, ForeignKeyRow, IndexColumnRow, PrimaryKeyRow};
use crate::typemap::TypeMapper;

/// Drop denied schemas, then sort and deduplicate the rest.
pub fn filter_schemas<S: AsRef<str>>(raw: Vec<String>, system_schemas: &[S]) -> Vec<String> {
    let mut schemas: Vec<String> = raw
        .into_iter()
        .filter(|schema| {
            !system_schemas
                .iter()
                .any(|denied| denied.as_ref() == schema.as_str())
        })
        .collect();
    schemas.sort();
    schemas.dedup();
    schemas
}

/// Requested schema names in first-seen order, without repeats.
pub fn unique_schema_names(names: &[String]) -> Vec<&str> {
    let mut seen = Vec::with_capacity(names.len());
    for name in names {
        if !seen.contains(&name.as_str()) {
            seen.push(name.as_str());
        }
    }
    seen
}

pub fn map_columns(mut raw: Vec<ColumnRow>, types: &dyn TypeMapper) -> Vec<Column> {
    raw.sort_by(|left, right| {
        left.ordinal_position
            .cmp(&right.ordinal_position)
            .then_with(|| left.name.cmp(&right.name))
    });

    raw.into_iter()
        .map(|col| Column {
            data_type: types.map_type(&col.catalog_type),
            name: col.name,
            nullable: col.is_nullable,
            default: col.default,
            is_primary_key: false,
        })
        .collect()
}

pub fn map_primary_keys(mut raw: Vec<PrimaryKeyRow>) -> Vec<String> {
    raw.sort_by(|left, right| {
        left.key_position
            .cmp(&right.key_position)
            .then_with(|| left.column_name.cmp(&right.column_name))
    });

    let mut keys: Vec<String> = Vec::with_capacity(raw.len());
    for row in raw {
        if !keys.contains(&row.column_name) {
            keys.push(row.column_name);
        }
    }
    keys
}

pub fn mark_primary_keys(columns: &mut [Column], primary_keys: &[String]) {
    for column in columns {
        column.is_primary_key = primary_keys.contains(&column.name);
    }
}

/// Group per-column index rows into indexes ordered by name, members in key order.
pub fn group_indexes(raw: Vec<IndexColumnRow>) -> Vec<Index> {
    let mut grouped: BTreeMap<String, (bool, Vec<(i32, String)>)> = BTreeMap::new();

    for row in raw {
        let entry = grouped.entry(row.index_name).or_default();
        entry.0 |= row.is_unique;
        entry.1.push((row.key_position, row.column_name));
    }

    grouped
        .into_iter()
        .map(|(name, (unique, mut members))| {
            members.sort();
            members.dedup();
            Index {
                name,
                columns: members.into_iter().map(|(_, column)| column).collect(),
                unique,
            }
        })
        .collect()
}

/// Build the references leaving `schema.table` from per-column-pair rows.
///
/// Rows are grouped per constraint into one reference carrying the full
/// column lists, then collapsed on [`ReferenceKey`]. The result is sorted by
/// that key.
pub fn group_foreign_keys(schema: &str, table: &str, raw: Vec<ForeignKeyRow>) -> Vec<Reference> {
    let mut constraints: BTreeMap<String, Vec<ForeignKeyRow>> = BTreeMap::new();
    for row in raw {
        constraints
            .entry(row.constraint_name.clone())
            .or_default()
            .push(row);
    }

    let mut references: BTreeMap<ReferenceKey, Reference> = BTreeMap::new();
    for (_, mut rows) in constraints {
        // Fold actions over every row before duplicates are dropped.
        let on_delete = rows
            .iter()
            .fold(ReferentialAction::NoAction, |action, row| action.merge(row.on_delete));
        let on_update = rows
            .iter()
            .fold(ReferentialAction::NoAction, |action, row| action.merge(row.on_update));

        rows.sort_by(|left, right| {
            left.key_position
                .cmp(&right.key_position)
                .then_with(|| left.column_name.cmp(&right.column_name))
                .then_with(|| left.foreign_column.cmp(&right.foreign_column))
        });
        rows.dedup_by(|later, earlier| {
            later.column_name == earlier.column_name
                && later.foreign_column == earlier.foreign_column
        });

        let Some(first) = rows.first() else {
            continue;
        };

        let reference = Reference {
            from_schema: schema.to_string(),
            from_table: table.to_string(),
            from_columns: rows.iter().map(|row| row.column_name.clone()).collect(),
            to_schema: first.foreign_schema.clone(),
            to_table: first.foreign_table.clone(),
            to_columns: rows.iter().map(|row| row.foreign_column.clone()).collect(),
            on_delete,
            on_update,
        };

        match references.entry(reference.key()) {
            Entry::Occupied(mut existing) => existing.get_mut().merge_actions(&reference),
            Entry::Vacant(slot) => {
                slot.insert(reference);
            }
        }
    }

    references.into_values().collect()
}
