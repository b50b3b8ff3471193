use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use pgdbml_core::{Error, Result, Schema};

use crate::adapter::Adapter;
use crate::catalog::{Catalog, ColumnRow, ForeignKeyRow, IndexColumnRow, PrimaryKeyRow};
use crate::introspector;
use crate::options::IntrospectOptions;
use crate::typemap::CatalogType;

mod queries;
mod utils;

pub use utils::fk_action_from_code;

/// [`Catalog`] backed by PostgreSQL's `information_schema` and `pg_catalog`.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Wrap a pre-configured pool. Its lifecycle stays with the caller.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a small pool for a one-shot introspection run.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await
            .map_err(|err| Error::Connection(err.to_string()))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Catalog for PostgresCatalog {
    async fn ping(&self) -> Result<()> {
        queries::ping(&self.pool).await
    }

    async fn list_schemas(&self) -> Result<Vec<String>> {
        queries::list_schemas(&self.pool).await
    }

    async fn list_tables(&self, schema: &str) -> Result<Vec<String>> {
        queries::list_tables(&self.pool, schema).await
    }

    async fn list_columns(&self, schema: &str, table: &str) -> Result<Vec<ColumnRow>> {
        let rows = queries::list_columns(&self.pool, schema, table).await?;
        Ok(rows
            .into_iter()
            .map(|row| ColumnRow {
                name: row.name,
                ordinal_position: row.ordinal_position,
                catalog_type: CatalogType {
                    data_type: row.data_type,
                    udt_name: row.udt_name,
                    character_max_length: row.character_max_length,
                    numeric_precision: row.numeric_precision,
                    numeric_scale: row.numeric_scale,
                },
                is_nullable: row.is_nullable,
                default: row.column_default,
            })
            .collect())
    }

    async fn list_primary_keys(&self, schema: &str, table: &str) -> Result<Vec<PrimaryKeyRow>> {
        let rows = queries::list_primary_keys(&self.pool, schema, table).await?;
        Ok(rows
            .into_iter()
            .map(|row| PrimaryKeyRow {
                column_name: row.column_name,
                key_position: row.key_position,
            })
            .collect())
    }

    async fn list_index_columns(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<IndexColumnRow>> {
        let rows = queries::list_index_columns(&self.pool, schema, table).await?;
        Ok(rows
            .into_iter()
            .map(|row| IndexColumnRow {
                index_name: row.index_name,
                column_name: row.column_name,
                key_position: row.key_position,
                is_unique: row.is_unique,
            })
            .collect())
    }

    async fn list_foreign_keys(&self, schema: &str, table: &str) -> Result<Vec<ForeignKeyRow>> {
        let rows = queries::list_foreign_keys(&self.pool, schema, table).await?;
        Ok(rows
            .into_iter()
            .map(|row| ForeignKeyRow {
                constraint_name: row.constraint_name,
                column_name: row.column_name,
                key_position: row.key_position,
                foreign_schema: row.foreign_schema,
                foreign_table: row.foreign_table,
                foreign_column: row.foreign_column,
                on_delete: fk_action_from_code(row.on_delete_code),
                on_update: fk_action_from_code(row.on_update_code),
            })
            .collect())
    }
}

/// Adapter for PostgreSQL databases.
#[derive(Debug, Clone)]
pub struct PostgresAdapter {
    catalog: PostgresCatalog,
}

impl PostgresAdapter {
    /// Create a new adapter using a pre-configured pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            catalog: PostgresCatalog::new(pool),
        }
    }

    pub fn catalog(&self) -> &PostgresCatalog {
        &self.catalog
    }
}

#[async_trait]
impl Adapter for PostgresAdapter {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn introspect(&self, opts: &IntrospectOptions) -> Result<Schema> {
        introspector::introspect(&self.catalog, opts).await
    }
}

/// Introspect Postgres with caller-provided options.
pub async fn introspect_postgres_with_options(
    pool: &PgPool,
    opts: IntrospectOptions,
) -> Result<Schema> {
    introspector::introspect(&PostgresCatalog::new(pool.clone()), &opts).await
}
