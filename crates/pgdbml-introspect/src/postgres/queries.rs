use sqlx::PgPool;

use pgdbml_core::{Error, Result};

fn db_error(err: sqlx::Error) -> Error {
    Error::Db(err.to_string())
}

pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query("select 1")
        .execute(pool)
        .await
        .map_err(|err| Error::Connection(err.to_string()))?;
    Ok(())
}

pub async fn list_schemas(pool: &PgPool) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        select schema_name::text
        from information_schema.schemata
        order by schema_name
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

pub async fn list_tables(pool: &PgPool, schema: &str) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        select table_name::text
        from information_schema.tables
        where table_schema::text = $1
          and table_type = 'BASE TABLE'
        order by table_name
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawColumn {
    pub name: String,
    pub ordinal_position: i32,
    pub data_type: String,
    pub udt_name: String,
    pub character_max_length: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_scale: Option<i32>,
    pub is_nullable: bool,
    pub column_default: Option<String>,
}

pub async fn list_columns(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<RawColumn>> {
    sqlx::query_as::<_, RawColumn>(
        r#"
        select
          c.column_name::text as name,
          c.ordinal_position::int4 as ordinal_position,
          c.data_type::text as data_type,
          coalesce(c.udt_name, c.data_type)::text as udt_name,
          c.character_maximum_length::int4 as character_max_length,
          c.numeric_precision::int4 as numeric_precision,
          c.numeric_scale::int4 as numeric_scale,
          (c.is_nullable::text = 'YES') as is_nullable,
          c.column_default::text as column_default
        from information_schema.columns c
        where c.table_schema::text = $1
          and c.table_name::text = $2
        order by c.ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawPrimaryKeyColumn {
    pub column_name: String,
    pub key_position: i32,
}

pub async fn list_primary_keys(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<RawPrimaryKeyColumn>> {
    sqlx::query_as::<_, RawPrimaryKeyColumn>(
        r#"
        select
          kcu.column_name::text as column_name,
          kcu.ordinal_position::int4 as key_position
        from information_schema.key_column_usage kcu
        join information_schema.table_constraints tc
          on kcu.constraint_name = tc.constraint_name
          and kcu.table_schema = tc.table_schema
          and kcu.table_name = tc.table_name
        where tc.constraint_type = 'PRIMARY KEY'
          and kcu.table_schema::text = $1
          and kcu.table_name::text = $2
        order by kcu.ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawIndexColumn {
    pub index_name: String,
    pub column_name: String,
    pub key_position: i32,
    pub is_unique: bool,
}

pub async fn list_index_columns(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<RawIndexColumn>> {
    sqlx::query_as::<_, RawIndexColumn>(
        r#"
        select
          idx.relname::text as index_name,
          att.attname::text as column_name,
          k.ordinality::int4 as key_position,
          i.indisunique as is_unique
        from pg_index i
        join pg_class tbl on tbl.oid = i.indrelid
        join pg_namespace nsp on nsp.oid = tbl.relnamespace
        join pg_class idx on idx.oid = i.indexrelid
        join unnest(i.indkey::int2[]) with ordinality as k(attnum, ordinality) on true
        join pg_attribute att on att.attrelid = tbl.oid and att.attnum = k.attnum
        where nsp.nspname::text = $1
          and tbl.relname::text = $2
          and not i.indisprimary
        order by idx.relname, k.ordinality
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawForeignKeyColumn {
    pub constraint_name: String,
    pub column_name: String,
    pub key_position: i32,
    pub foreign_schema: String,
    pub foreign_table: String,
    pub foreign_column: String,
    pub on_delete_code: i8,
    pub on_update_code: i8,
}

pub async fn list_foreign_keys(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<RawForeignKeyColumn>> {
    sqlx::query_as::<_, RawForeignKeyColumn>(
        r#"
        select
          con.conname::text as constraint_name,
          src_att.attname::text as column_name,
          k.ordinality::int4 as key_position,
          ref_nsp.nspname::text as foreign_schema,
          ref_rel.relname::text as foreign_table,
          ref_att.attname::text as foreign_column,
          con.confdeltype as on_delete_code,
          con.confupdtype as on_update_code
        from pg_constraint con
        join pg_class src_rel on src_rel.oid = con.conrelid
        join pg_namespace src_nsp on src_nsp.oid = src_rel.relnamespace
        join pg_class ref_rel on ref_rel.oid = con.confrelid
        join pg_namespace ref_nsp on ref_nsp.oid = ref_rel.relnamespace
        join unnest(con.conkey, con.confkey) with ordinality
          as k(src_attnum, ref_attnum, ordinality) on true
        join pg_attribute src_att
          on src_att.attrelid = src_rel.oid and src_att.attnum = k.src_attnum
        join pg_attribute ref_att
          on ref_att.attrelid = ref_rel.oid and ref_att.attnum = k.ref_attnum
        where src_nsp.nspname::text = $1
          and src_rel.relname::text = $2
          and con.contype = 'f'
        order by con.conname, k.ordinality
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}
