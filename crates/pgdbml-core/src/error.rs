use std::fmt;

use thiserror::Error;

/// Catalog query being executed when introspection failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOperation {
    ListSchemas,
    ListTables,
    Columns,
    PrimaryKeys,
    Indexes,
    ForeignKeys,
}

impl fmt::Display for CatalogOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CatalogOperation::ListSchemas => "listing schemas",
            CatalogOperation::ListTables => "listing tables",
            CatalogOperation::Columns => "fetching columns",
            CatalogOperation::PrimaryKeys => "fetching primary keys",
            CatalogOperation::Indexes => "fetching indexes",
            CatalogOperation::ForeignKeys => "fetching foreign keys",
        };
        f.write_str(label)
    }
}

/// Core error type shared across pgdbml crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The supplied database handle cannot be reached.
    #[error("connection error: {0}")]
    Connection(String),
    /// A catalog query failed; carries the schema/table it was issued for.
    /// The driver failure is only reachable through `source()`.
    #[error("introspection failed while {operation} for {}", target(.schema, .table))]
    Introspection {
        operation: CatalogOperation,
        schema: Option<String>,
        table: Option<String>,
        #[source]
        source: Box<Error>,
    },
    /// Raw driver failure, before introspection context is attached.
    #[error("database error: {0}")]
    Db(String),
    /// The schema violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// Options or configuration values that cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Wrap `self` with the catalog operation and location that produced it.
    pub fn during(
        self,
        operation: CatalogOperation,
        schema: Option<&str>,
        table: Option<&str>,
    ) -> Self {
        Error::Introspection {
            operation,
            schema: schema.map(str::to_string),
            table: table.map(str::to_string),
            source: Box::new(self),
        }
    }
}

fn target(schema: &Option<String>, table: &Option<String>) -> String {
    match (schema, table) {
        (Some(schema), Some(table)) => format!("table {schema}.{table}"),
        (Some(schema), None) => format!("schema {schema}"),
        (None, Some(table)) => format!("table {table}"),
        (None, None) => "catalog".to_string(),
    }
}

/// Convenience alias for results returned by pgdbml crates.
pub type Result<T> = std::result::Result<T, Error>;
