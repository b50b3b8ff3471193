use std::sync::Arc;

use pgdbml_core::DEFAULT_SCHEMA;

use crate::typemap::{PostgresTypeMapper, TypeMapper};

/// Internal schemas skipped when every schema is requested.
pub const DEFAULT_SYSTEM_SCHEMAS: &[&str] = &[
    "information_schema",
    "pg_catalog",
    "pg_toast",
    "pg_temp_1",
    "pg_toast_temp_1",
];

/// Which schemas to introspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSelection {
    /// The listed schemas, in order. An empty list means `public`.
    Named(Vec<String>),
    /// Every schema not in the system deny-list.
    All,
}

impl Default for SchemaSelection {
    fn default() -> Self {
        SchemaSelection::Named(vec![DEFAULT_SCHEMA.to_string()])
    }
}

/// Options that control how introspection behaves.
#[derive(Debug, Clone)]
pub struct IntrospectOptions {
    pub schemas: SchemaSelection,
    /// Bare table names removed after introspection.
    pub exclude_tables: Vec<String>,
    pub system_schemas: Vec<String>,
    pub type_mapper: Arc<dyn TypeMapper>,
}

impl Default for IntrospectOptions {
    fn default() -> Self {
        Self {
            schemas: SchemaSelection::default(),
            exclude_tables: Vec::new(),
            system_schemas: DEFAULT_SYSTEM_SCHEMAS
                .iter()
                .map(|schema| schema.to_string())
                .collect(),
            type_mapper: Arc::new(PostgresTypeMapper::default()),
        }
    }
}

impl IntrospectOptions {
    pub fn with_schemas<I, S>(mut self, schemas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemas = SchemaSelection::Named(schemas.into_iter().map(Into::into).collect());
        self
    }

    /// Introspect every non-system schema; overrides [`Self::with_schemas`].
    pub fn with_all_schemas(mut self) -> Self {
        self.schemas = SchemaSelection::All;
        self
    }

    pub fn with_exclude_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_tables = tables.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_system_schemas<I, S>(mut self, schemas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.system_schemas = schemas.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_type_mapper(mut self, mapper: impl TypeMapper + 'static) -> Self {
        self.type_mapper = Arc::new(mapper);
        self
    }

    /// Shorthand for a [`PostgresTypeMapper`] with the given overrides.
    pub fn with_type_mappings<I, K, V>(self, mappings: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.with_type_mapper(PostgresTypeMapper::with_overrides(mappings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typemap::CatalogType;

    #[test]
    fn defaults_to_public_schema() {
        let opts = IntrospectOptions::default();
        assert_eq!(opts.schemas, SchemaSelection::Named(vec!["public".to_string()]));
        assert!(opts.system_schemas.iter().any(|schema| schema == "pg_catalog"));
        assert!(opts.exclude_tables.is_empty());
    }

    #[test]
    fn all_schemas_overrides_named_list() {
        let opts = IntrospectOptions::default()
            .with_schemas(["public", "auth"])
            .with_all_schemas();
        assert_eq!(opts.schemas, SchemaSelection::All);
    }

    #[test]
    fn type_mappings_install_override_mapper() {
        let opts = IntrospectOptions::default().with_type_mappings([("citext", "text")]);
        let mapped = opts
            .type_mapper
            .map_type(&CatalogType::new("USER-DEFINED", "citext"));
        assert_eq!(mapped, "text");
    }
}
