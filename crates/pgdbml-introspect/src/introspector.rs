use pgdbml_core::{CatalogOperation, DEFAULT_SCHEMA, Error, Result, Schema, Table, filter_tables};

use crate::catalog::Catalog;
use crate::mapper;
use crate::options::{IntrospectOptions, SchemaSelection};
use crate::typemap::TypeMapper;

/// List every schema name except the denied system schemas, sorted.
pub async fn list_schemas<C, S>(catalog: &C, system_schemas: &[S]) -> Result<Vec<String>>
where
    C: Catalog + ?Sized,
    S: AsRef<str>,
{
    let raw = catalog
        .list_schemas()
        .await
        .map_err(|err| err.during(CatalogOperation::ListSchemas, None, None))?;
    Ok(mapper::filter_schemas(raw, system_schemas))
}

/// Introspect the named schemas, in the order given.
///
/// Any failed catalog query aborts the whole call; no partial schema is
/// returned. An empty name list means `public`.
pub async fn introspect_schemas<C>(
    catalog: &C,
    names: &[String],
    types: &dyn TypeMapper,
) -> Result<Schema>
where
    C: Catalog + ?Sized,
{
    let default_names = [DEFAULT_SCHEMA.to_string()];
    let names = if names.is_empty() {
        &default_names[..]
    } else {
        names
    };

    let mut tables = Vec::new();
    for schema_name in mapper::unique_schema_names(names) {
        let mut table_names = catalog.list_tables(schema_name).await.map_err(|err| {
            err.during(CatalogOperation::ListTables, Some(schema_name), None)
        })?;
        // Byte order, independent of the server collation.
        table_names.sort();
        table_names.dedup();

        tracing::debug!(
            event = "schema_introspection_started",
            schema = %schema_name,
            tables = table_names.len()
        );

        for table_name in &table_names {
            tables.push(introspect_table(catalog, schema_name, table_name, types).await?);
        }
    }

    Ok(Schema { tables })
}

async fn introspect_table<C>(
    catalog: &C,
    schema: &str,
    table: &str,
    types: &dyn TypeMapper,
) -> Result<Table>
where
    C: Catalog + ?Sized,
{
    let located = |operation: CatalogOperation| {
        move |err: Error| err.during(operation, Some(schema), Some(table))
    };

    let raw_columns = catalog
        .list_columns(schema, table)
        .await
        .map_err(located(CatalogOperation::Columns))?;
    let mut columns = mapper::map_columns(raw_columns, types);

    let raw_pk = catalog
        .list_primary_keys(schema, table)
        .await
        .map_err(located(CatalogOperation::PrimaryKeys))?;
    let primary_keys = mapper::map_primary_keys(raw_pk);
    mapper::mark_primary_keys(&mut columns, &primary_keys);

    let raw_indexes = catalog
        .list_index_columns(schema, table)
        .await
        .map_err(located(CatalogOperation::Indexes))?;
    let indexes = mapper::group_indexes(raw_indexes);

    let raw_fks = catalog
        .list_foreign_keys(schema, table)
        .await
        .map_err(located(CatalogOperation::ForeignKeys))?;
    let fk_rows = raw_fks.len();
    let references = mapper::group_foreign_keys(schema, table, raw_fks);

    tracing::debug!(
        event = "table_introspected",
        schema = %schema,
        table = %table,
        columns = columns.len(),
        indexes = indexes.len(),
        fk_rows,
        references = references.len()
    );

    Ok(Table {
        name: table.to_string(),
        schema: schema.to_string(),
        columns,
        primary_keys,
        indexes,
        references,
    })
}

/// Introspect a database according to the provided options.
///
/// Checks the handle first, resolves the schema list, introspects it and
/// finally applies the table exclusion list.
pub async fn introspect<C>(catalog: &C, opts: &IntrospectOptions) -> Result<Schema>
where
    C: Catalog + ?Sized,
{
    catalog.ping().await.map_err(|err| match err {
        Error::Connection(_) => err,
        other => Error::Connection(other.to_string()),
    })?;

    let names = match &opts.schemas {
        SchemaSelection::All => list_schemas(catalog, &opts.system_schemas).await?,
        SchemaSelection::Named(names) => names.clone(),
    };

    tracing::info!(event = "introspection_started", schemas = ?names);

    let schema = introspect_schemas(catalog, &names, opts.type_mapper.as_ref()).await?;
    let schema = if opts.exclude_tables.is_empty() {
        schema
    } else {
        let filtered = filter_tables(&schema, &opts.exclude_tables);
        tracing::debug!(
            event = "tables_excluded",
            removed = schema.tables.len() - filtered.tables.len()
        );
        filtered
    };

    tracing::info!(event = "introspection_finished", tables = schema.tables.len());

    Ok(schema)
}
