//! Database catalog introspection.
//!
//! Builds a [`pgdbml_core::Schema`] from catalog metadata. The database is
//! reached through the [`Catalog`] trait; [`PostgresCatalog`] is the sqlx
//! implementation.

pub mod adapter;
pub mod catalog;
pub mod introspector;
pub mod mapper;
pub mod options;
pub mod postgres;
pub mod typemap;

pub use adapter::Adapter;
pub use catalog::{Catalog, ColumnRow, ForeignKeyRow, IndexColumnRow, PrimaryKeyRow};
pub use introspector::{introspect, introspect_schemas, list_schemas};
pub use options::{DEFAULT_SYSTEM_SCHEMAS, IntrospectOptions, SchemaSelection};
pub use postgres::{PostgresAdapter, PostgresCatalog, introspect_postgres_with_options};
pub use typemap::{
    CatalogType, DEFAULT_TYPE_MAPPINGS, PostgresTypeMapper, TypeMapper, map_postgres_type,
    normalize_custom_type,
};

pub use pgdbml_core::Schema;
