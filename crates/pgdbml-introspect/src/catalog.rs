use async_trait::async_trait;

use pgdbml_core::{ReferentialAction, Result};

use crate::typemap::CatalogType;

/// One column as described by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRow {
    pub name: String,
    pub ordinal_position: i32,
    pub catalog_type: CatalogType,
    pub is_nullable: bool,
    pub default: Option<String>,
}

/// One member column of a table's primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyRow {
    pub column_name: String,
    pub key_position: i32,
}

/// One member column of a non-primary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumnRow {
    pub index_name: String,
    pub column_name: String,
    pub key_position: i32,
    pub is_unique: bool,
}

/// One column pair of a (possibly composite) foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRow {
    pub constraint_name: String,
    pub column_name: String,
    pub key_position: i32,
    pub foreign_schema: String,
    pub foreign_table: String,
    pub foreign_column: String,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
}

/// Read-only access to a database catalog.
///
/// Each method issues one query and returns its fully consumed rows. Row
/// order is not significant: the introspector sorts and groups everything
/// itself.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Check that the underlying handle is reachable.
    async fn ping(&self) -> Result<()>;

    async fn list_schemas(&self) -> Result<Vec<String>>;

    /// Base tables (no views) in `schema`.
    async fn list_tables(&self, schema: &str) -> Result<Vec<String>>;

    async fn list_columns(&self, schema: &str, table: &str) -> Result<Vec<ColumnRow>>;

    async fn list_primary_keys(&self, schema: &str, table: &str) -> Result<Vec<PrimaryKeyRow>>;

    /// Columns of every index on the table except the primary-key index.
    async fn list_index_columns(&self, schema: &str, table: &str)
    -> Result<Vec<IndexColumnRow>>;

    async fn list_foreign_keys(&self, schema: &str, table: &str) -> Result<Vec<ForeignKeyRow>>;
}
