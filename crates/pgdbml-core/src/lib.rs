//! Core contracts for pgdbml.
//!
//! This crate defines the schema model shared by the introspector and the
//! DBML formatter, the common error type, and the pure transformations
//! (table filtering, validation) applied between the two, plus connection
//! string redaction for logs.

pub mod error;
pub mod filter;
pub mod redaction;
pub mod schema;
pub mod validation;

pub use error::{CatalogOperation, Error, Result};
pub use filter::filter_tables;
pub use redaction::{ConnectionSummary, redact_connection_string};
pub use schema::{
    Column, DEFAULT_SCHEMA, Index, Reference, ReferenceKey, ReferentialAction, Schema, Table,
    qualified_table_name,
};
pub use validation::validate_schema;
