//! Database-side inspection routines.
//!
//! Each routine issues a handful of read-only queries and returns an outcome
//! for `report` to render. None of them writes to the database.

use sqlx::PgConnection;

use crate::catalog;
use crate::errors::{DiscoveryError, ResultExt};
use crate::models::{
    ComputedColumns, DatabaseOverview, ExclusionPattern, ExclusionStats, ExclusionTracking,
    FunctionProbe, Lookup, SearchHistoryEntry, SearchSession, SessionTracking, ViewProbe,
};

pub const JOBS_TABLE: &str = "scraped_jobs";
pub const METADATA_TABLE: &str = "job_user_metadata";
pub const EXCLUSION_SOURCES_COLUMN: &str = "exclusion_sources";
pub const PRIMARY_VIEW: &str = "job_board_main";

/// Scalar functions probed with a fixed sample argument.
pub const COMPUTED_FUNCTIONS: [(&str, &str); 2] = [
    ("extract_job_role", "Data Analyst Remote"),
    ("classify_location_scope", "Boulder, CO"),
];

const EXCLUSION_PATTERN_LIMIT: i64 = 10;
const RECENT_SESSION_LIMIT: i64 = 5;
const RECENT_HISTORY_LIMIT: i64 = 3;

pub async fn database_overview(
    conn: &mut PgConnection,
) -> Result<DatabaseOverview, DiscoveryError> {
    let full_version: String = sqlx::query_scalar("SELECT version()")
        .fetch_one(&mut *conn)
        .await
        .context("Reading server version")?;
    let version = full_version
        .split(',')
        .next()
        .unwrap_or_default()
        .to_string();

    let size: String =
        sqlx::query_scalar("SELECT pg_size_pretty(pg_database_size(current_database()))")
            .fetch_one(&mut *conn)
            .await
            .context("Reading database size")?;

    let total_jobs = count_rows(conn, &format!("SELECT COUNT(*) FROM {}", JOBS_TABLE)).await;
    let excluded_jobs = count_rows(
        conn,
        &format!("SELECT COUNT(*) FROM {} WHERE excluded = true", METADATA_TABLE),
    )
    .await;

    Ok(DatabaseOverview {
        version,
        size,
        total_jobs,
        excluded_jobs,
    })
}

/// Runs a `COUNT(*)` query, treating any failure as a missing table.
async fn count_rows(conn: &mut PgConnection, sql: &str) -> Lookup<i64> {
    match sqlx::query_scalar::<_, i64>(sql).fetch_one(&mut *conn).await {
        Ok(count) => Lookup::Found(count),
        Err(e) => {
            tracing::debug!("Count query failed ({}): {}", sql, e);
            Lookup::NotFound
        }
    }
}

pub async fn computed_columns(conn: &mut PgConnection) -> ComputedColumns {
    let mut functions = Vec::with_capacity(COMPUTED_FUNCTIONS.len());
    for (function, sample) in COMPUTED_FUNCTIONS {
        // Function names are fixed identifiers, only the argument is bound
        let sql = format!("SELECT {}($1)::text", function);
        let result = sqlx::query_scalar::<_, Option<String>>(&sql)
            .bind(sample)
            .fetch_one(&mut *conn)
            .await
            .map_err(DiscoveryError::from);
        if let Err(ref e) = result {
            tracing::warn!("{}() probe failed: {}", function, e);
        }
        functions.push(FunctionProbe {
            function,
            sample,
            result,
        });
    }

    let view_sql = format!(
        "SELECT job_role::text, location_scope::text FROM {} LIMIT 1",
        PRIMARY_VIEW
    );
    let view = match sqlx::query_as::<_, (Option<String>, Option<String>)>(&view_sql)
        .fetch_optional(&mut *conn)
        .await
    {
        Ok(Some((job_role, location_scope))) => ViewProbe::Populated {
            job_role,
            location_scope,
        },
        Ok(None) => ViewProbe::Empty,
        Err(e) => {
            tracing::warn!("Computed columns unavailable in {}: {}", PRIMARY_VIEW, e);
            ViewProbe::Unavailable(e.into())
        }
    };

    ComputedColumns { functions, view }
}

pub async fn exclusion_tracking(
    conn: &mut PgConnection,
) -> Result<ExclusionTracking, DiscoveryError> {
    if !catalog::column_exists(conn, METADATA_TABLE, EXCLUSION_SOURCES_COLUMN).await? {
        return Ok(ExclusionTracking::ColumnMissing);
    }

    let patterns: Vec<(serde_json::Value, i64)> = sqlx::query_as(&format!(
        r#"
        SELECT exclusion_sources, COUNT(*) AS count
        FROM {table}
        WHERE exclusion_sources IS NOT NULL
          AND exclusion_sources != '[]'::jsonb
        GROUP BY exclusion_sources
        ORDER BY count DESC, exclusion_sources::text
        LIMIT $1
        "#,
        table = METADATA_TABLE
    ))
    .bind(EXCLUSION_PATTERN_LIMIT)
    .fetch_all(&mut *conn)
    .await
    .context("Aggregating exclusion sources")?;

    let (total_metadata, with_session_id, with_applied_at): (i64, i64, i64) =
        sqlx::query_as(&format!(
            r#"
            SELECT COUNT(*), COUNT(exclusion_session_id), COUNT(exclusion_applied_at)
            FROM {}
            "#,
            METADATA_TABLE
        ))
        .fetch_one(&mut *conn)
        .await
        .context("Counting exclusion session fields")?;

    Ok(ExclusionTracking::Tracked {
        patterns: patterns
            .into_iter()
            .map(|(sources, count)| ExclusionPattern { sources, count })
            .collect(),
        stats: ExclusionStats {
            total_metadata,
            with_session_id,
            with_applied_at,
        },
    })
}

pub async fn session_tracking(
    conn: &mut PgConnection,
) -> Result<SessionTracking, DiscoveryError> {
    let sessions = sqlx::query_as::<_, SearchSession>(
        r#"
        SELECT id::text AS id,
               start_time::timestamp AS start_time,
               end_time::timestamp AS end_time,
               status::text AS status,
               EXTRACT(EPOCH FROM (COALESCE(end_time, CURRENT_TIMESTAMP) - start_time))::float8
                   AS duration_seconds
        FROM search_sessions
        WHERE start_time > CURRENT_TIMESTAMP - INTERVAL '30 days'
        ORDER BY start_time DESC
        LIMIT $1
        "#,
    )
    .bind(RECENT_SESSION_LIMIT)
    .fetch_all(&mut *conn)
    .await
    .context("Reading recent search sessions")?;

    let history = sqlx::query_as::<_, SearchHistoryEntry>(
        r#"
        SELECT search_query::text AS search_query,
               new_jobs_inserted::bigint AS new_jobs_inserted,
               duration_seconds::float8 AS duration_seconds,
               "timestamp"::timestamp AS "timestamp"
        FROM search_history
        ORDER BY "timestamp" DESC
        LIMIT $1
        "#,
    )
    .bind(RECENT_HISTORY_LIMIT)
    .fetch_all(&mut *conn)
    .await
    .context("Reading search history")?;

    Ok(SessionTracking { sessions, history })
}
