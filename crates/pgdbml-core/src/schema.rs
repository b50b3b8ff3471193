use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Name of the schema whose tables are rendered without a prefix.
pub const DEFAULT_SCHEMA: &str = "public";

/// Top-level model produced by introspection and consumed by the formatter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Schema {
    /// Tables found across every introspected schema, in introspection order.
    pub tables: Vec<Table>,
}

/// A base table with its columns, keys, indexes and outgoing references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    /// Table name without schema qualification.
    pub name: String,
    /// Owning schema (e.g. `public`).
    pub schema: String,
    /// Columns in catalog ordinal order.
    pub columns: Vec<Column>,
    /// Primary key column names in key order.
    pub primary_keys: Vec<String>,
    /// Non-primary indexes.
    pub indexes: Vec<Index>,
    /// Foreign keys originating from this table.
    pub references: Vec<Reference>,
}

impl Table {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            ..Self::default()
        }
    }

    /// Name prefixed with its schema unless it lives in `public`.
    pub fn qualified_name(&self) -> String {
        qualified_table_name(&self.schema, &self.name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub name: String,
    /// Resolved DBML type (e.g. `varchar(255)`, `decimal(10,2)`).
    pub data_type: String,
    pub nullable: bool,
    /// Raw default expression as reported by the catalog.
    pub default: Option<String>,
    pub is_primary_key: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            default: None,
            is_primary_key: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Index {
    pub name: String,
    /// Member columns in index key order.
    pub columns: Vec<String>,
    pub unique: bool,
}

/// Directed foreign-key edge between two tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Reference {
    pub from_schema: String,
    pub from_table: String,
    pub from_columns: Vec<String>,
    pub to_schema: String,
    pub to_table: String,
    pub to_columns: Vec<String>,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
}

impl Reference {
    /// Structured identity used to collapse duplicate catalog rows.
    pub fn key(&self) -> ReferenceKey {
        ReferenceKey {
            from_schema: self.from_schema.clone(),
            from_table: self.from_table.clone(),
            from_columns: self.from_columns.clone(),
            to_schema: self.to_schema.clone(),
            to_table: self.to_table.clone(),
            to_columns: self.to_columns.clone(),
        }
    }

    /// Fold the actions of a duplicate row into `self`.
    ///
    /// The most restrictive action of the two wins, see
    /// [`ReferentialAction::merge`].
    pub fn merge_actions(&mut self, other: &Reference) {
        self.on_delete = self.on_delete.merge(other.on_delete);
        self.on_update = self.on_update.merge(other.on_update);
    }
}

/// Deduplication key for references. Ordered field by field, so sorting keys
/// gives a stable reference order without string concatenation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReferenceKey {
    pub from_schema: String,
    pub from_table: String,
    pub from_columns: Vec<String>,
    pub to_schema: String,
    pub to_table: String,
    pub to_columns: Vec<String>,
}

/// Referential action triggered on delete or update of the referenced row.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    /// Parse a catalog rule such as `CASCADE` or `SET NULL`.
    ///
    /// Empty or unrecognised text is treated as `NO ACTION`.
    pub fn from_rule(rule: &str) -> Self {
        match rule.trim().to_ascii_uppercase().as_str() {
            "CASCADE" => ReferentialAction::Cascade,
            "RESTRICT" => ReferentialAction::Restrict,
            "SET NULL" => ReferentialAction::SetNull,
            "SET DEFAULT" => ReferentialAction::SetDefault,
            _ => ReferentialAction::NoAction,
        }
    }

    /// Lower-cased DBML spelling.
    pub fn as_dbml(&self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "no action",
            ReferentialAction::Restrict => "restrict",
            ReferentialAction::Cascade => "cascade",
            ReferentialAction::SetNull => "set null",
            ReferentialAction::SetDefault => "set default",
        }
    }

    pub fn is_no_action(&self) -> bool {
        matches!(self, ReferentialAction::NoAction)
    }

    /// Rank used by [`Self::merge`]: restrict > cascade > set null >
    /// set default > no action.
    pub fn restrictiveness(self) -> u8 {
        match self {
            ReferentialAction::NoAction => 0,
            ReferentialAction::SetDefault => 1,
            ReferentialAction::SetNull => 2,
            ReferentialAction::Cascade => 3,
            ReferentialAction::Restrict => 4,
        }
    }

    /// Combine two actions reported for the same reference, keeping the most
    /// restrictive one. Commutative, so row order never changes the result.
    pub fn merge(self, other: Self) -> Self {
        if other.restrictiveness() > self.restrictiveness() {
            other
        } else {
            self
        }
    }
}

/// Table name prefixed with its schema, unless the schema is empty or `public`.
pub fn qualified_table_name(schema: &str, table: &str) -> String {
    if schema.is_empty() || schema == DEFAULT_SCHEMA {
        table.to_string()
    } else {
        format!("{schema}.{table}")
    }
}
