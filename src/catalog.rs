//! Schema catalog introspection through `information_schema`.
//!
//! Catalog columns are cast to `text`: `information_schema` exposes them as
//! domain types (`sql_identifier`, `character_data`) that do not decode as
//! `String` directly.

use sqlx::PgConnection;

use crate::errors::{DiscoveryError, ResultExt};
use crate::models::{CatalogEntry, ColumnInfo, RelationKind};

/// Every table and view in `schema`, ordered by kind then name.
pub async fn list_relations(
    conn: &mut PgConnection,
    schema: &str,
) -> Result<Vec<(String, RelationKind)>, DiscoveryError> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        r#"
        SELECT table_name::text, table_type::text
        FROM information_schema.tables
        WHERE table_schema = $1
        ORDER BY table_type, table_name
        "#,
    )
    .bind(schema)
    .fetch_all(&mut *conn)
    .await
    .context("Listing tables and views")?;

    Ok(rows
        .into_iter()
        .map(|(name, kind)| (name, RelationKind::from_table_type(&kind)))
        .collect())
}

/// Columns of one relation in ordinal order.
pub async fn list_columns(
    conn: &mut PgConnection,
    schema: &str,
    table: &str,
) -> Result<Vec<ColumnInfo>, DiscoveryError> {
    sqlx::query_as::<_, ColumnInfo>(
        r#"
        SELECT column_name::text AS column_name,
               data_type::text AS data_type,
               is_nullable::text AS is_nullable,
               column_default::text AS column_default
        FROM information_schema.columns
        WHERE table_schema = $1 AND table_name = $2
        ORDER BY ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(&mut *conn)
    .await
    .context(format!("Listing columns of {}", table))
}

/// Full inventory: each relation once, with all of its columns.
pub async fn load_catalog(
    conn: &mut PgConnection,
    schema: &str,
) -> Result<Vec<CatalogEntry>, DiscoveryError> {
    let relations = list_relations(conn, schema).await?;
    tracing::debug!("Found {} relations in schema {}", relations.len(), schema);

    let mut entries = Vec::with_capacity(relations.len());
    for (name, kind) in relations {
        let columns = list_columns(conn, schema, &name).await?;
        entries.push(CatalogEntry {
            name,
            kind,
            columns,
        });
    }

    Ok(entries)
}

/// Names of the tables and views the gateway can expose, alphabetically.
pub async fn list_exposed_relations(
    conn: &mut PgConnection,
    schema: &str,
) -> Result<Vec<String>, DiscoveryError> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT table_name::text
        FROM information_schema.tables
        WHERE table_schema = $1 AND table_type IN ('VIEW', 'BASE TABLE')
        ORDER BY table_name
        "#,
    )
    .bind(schema)
    .fetch_all(&mut *conn)
    .await
    .context("Listing gateway-exposed relations")
}

/// Whether `table` has a column named `column` in any visible schema.
pub async fn column_exists(
    conn: &mut PgConnection,
    table: &str,
    column: &str,
) -> Result<bool, DiscoveryError> {
    let found: Option<String> = sqlx::query_scalar(
        r#"
        SELECT column_name::text
        FROM information_schema.columns
        WHERE table_name = $1 AND column_name = $2
        LIMIT 1
        "#,
    )
    .bind(table)
    .bind(column)
    .fetch_optional(&mut *conn)
    .await
    .context(format!("Checking for {}.{}", table, column))?;

    Ok(found.is_some())
}
