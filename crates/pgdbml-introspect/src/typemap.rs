//! Conversion from catalog column types to DBML type tokens.

use std::collections::BTreeMap;
use std::fmt;

/// Type information for one column as reported by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogType {
    /// Base data type (e.g. `integer`, `character varying`, `USER-DEFINED`).
    pub data_type: String,
    /// Underlying type name (e.g. `int4`, `_int4`, `mood`).
    pub udt_name: String,
    pub character_max_length: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_scale: Option<i32>,
}

impl CatalogType {
    pub fn new(data_type: impl Into<String>, udt_name: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            udt_name: udt_name.into(),
            ..Self::default()
        }
    }

    pub fn with_length(mut self, length: i32) -> Self {
        self.character_max_length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: i32, scale: i32) -> Self {
        self.numeric_precision = Some(precision);
        self.numeric_scale = Some(scale);
        self
    }
}

/// Converts catalog column types into DBML type strings.
///
/// Implementations must never fail: unknown types fall back to a best-effort
/// string instead of an error.
pub trait TypeMapper: fmt::Debug + Send + Sync {
    fn map_type(&self, column_type: &CatalogType) -> String;
}

/// PostgreSQL type mapper with optional case-insensitive overrides.
///
/// Overrides are consulted against both the base type and the UDT name
/// before the built-in table.
#[derive(Debug, Clone, Default)]
pub struct PostgresTypeMapper {
    overrides: BTreeMap<String, String>,
}

impl PostgresTypeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapper from `(postgres type, dbml type)` pairs.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            overrides: overrides
                .into_iter()
                .map(|(key, value)| (key.as_ref().to_lowercase(), value.into()))
                .collect(),
        }
    }

    pub fn overrides(&self) -> &BTreeMap<String, String> {
        &self.overrides
    }
}

impl TypeMapper for PostgresTypeMapper {
    fn map_type(&self, column_type: &CatalogType) -> String {
        let by_data_type = self.overrides.get(&column_type.data_type.to_lowercase());
        let by_udt = || self.overrides.get(&column_type.udt_name.to_lowercase());
        match by_data_type.or_else(by_udt) {
            Some(mapped) => mapped.clone(),
            None => map_postgres_type(column_type),
        }
    }
}

/// Built-in PostgreSQL → DBML mappings for types without modifiers.
pub const DEFAULT_TYPE_MAPPINGS: &[(&str, &str)] = &[
    ("integer", "int"),
    ("int4", "int"),
    ("bigint", "bigint"),
    ("int8", "bigint"),
    ("smallint", "smallint"),
    ("int2", "smallint"),
    ("boolean", "boolean"),
    ("bool", "boolean"),
    ("text", "text"),
    ("character varying", "varchar"),
    ("varchar", "varchar"),
    ("character", "char"),
    ("char", "char"),
    ("numeric", "decimal"),
    ("decimal", "decimal"),
    ("real", "float"),
    ("float4", "float"),
    ("double precision", "double"),
    ("float8", "double"),
    ("timestamp without time zone", "timestamp"),
    ("timestamp", "timestamp"),
    ("timestamp with time zone", "timestamptz"),
    ("timestamptz", "timestamptz"),
    ("date", "date"),
    ("time without time zone", "time"),
    ("time", "time"),
    ("time with time zone", "timetz"),
    ("timetz", "timetz"),
    ("uuid", "uuid"),
    ("json", "json"),
    ("jsonb", "jsonb"),
    ("bytea", "binary"),
];

const FALLBACK_TYPE: &str = "text";

/// Map a PostgreSQL column type to DBML using the built-in table.
///
/// `USER-DEFINED` and `ARRAY` types are normalised through
/// [`normalize_custom_type`]; any other unknown base type is returned as-is.
pub fn map_postgres_type(column_type: &CatalogType) -> String {
    let lowered = column_type.data_type.to_lowercase();
    match lowered.as_str() {
        "character varying" | "varchar" => {
            with_length("varchar", column_type.character_max_length)
        }
        "character" | "char" => with_length("char", column_type.character_max_length),
        "numeric" | "decimal" => {
            match (column_type.numeric_precision, column_type.numeric_scale) {
                (Some(precision), Some(scale)) => format!("decimal({precision},{scale})"),
                _ => "decimal".to_string(),
            }
        }
        "user-defined" | "array" => normalize_custom_type(&column_type.udt_name),
        other => lookup(DEFAULT_TYPE_MAPPINGS, other)
            .map(str::to_string)
            .unwrap_or_else(|| column_type.data_type.clone()),
    }
}

/// Normalise a custom or array type name (`_name` is an array of `name`).
///
/// Every such name maps to `text`; closer DBML types for extensions such as
/// `citext` come from caller overrides.
pub fn normalize_custom_type(type_name: &str) -> String {
    let element = type_name.strip_prefix('_').unwrap_or(type_name);
    tracing::trace!(event = "custom_type_normalized", udt = %element, mapped = FALLBACK_TYPE);
    FALLBACK_TYPE.to_string()
}

fn with_length(base: &str, length: Option<i32>) -> String {
    match length {
        Some(length) => format!("{base}({length})"),
        None => base.to_string(),
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, mapped)| *mapped)
}
