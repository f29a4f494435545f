//! Turns inspection outcomes into report lines.
//!
//! Everything here is pure: the orchestrator decides where the lines go.

use chrono::NaiveDateTime;

use crate::config::Config;
use crate::errors::DiscoveryError;
use crate::frontend_config::FrontendConfig;
use crate::inspections::{JOBS_TABLE, METADATA_TABLE, PRIMARY_VIEW};
use crate::models::{
    CapabilityProbe, CatalogEntry, ColumnInfo, ComputedColumns, DatabaseOverview,
    EndpointOutcome, EndpointProbe, ExclusionTracking, GatewaySection, Lookup, QueryOutcome,
    SearchSession, SessionTracking, ViewProbe,
};

/// Field names shown per previewed endpoint before truncating.
pub const FIELD_PREVIEW_LIMIT: usize = 8;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a count with `,` thousands separators.
pub fn format_count(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// `"ongoing"` without an end time, otherwise seconds to one decimal.
pub fn duration_label(session: &SearchSession) -> String {
    if session.is_ongoing() {
        return "ongoing".to_string();
    }
    match session.duration_seconds {
        Some(seconds) => format!("{:.1}s", seconds),
        None => "unknown".to_string(),
    }
}

/// Comma-joined field names, truncated with `...` past the preview limit.
pub fn field_preview(fields: &[String]) -> String {
    let shown: Vec<&str> = fields
        .iter()
        .take(FIELD_PREVIEW_LIMIT)
        .map(String::as_str)
        .collect();
    let ellipsis = if fields.len() > FIELD_PREVIEW_LIMIT {
        "..."
    } else {
        ""
    };
    format!("{}{}", shown.join(", "), ellipsis)
}

pub fn column_line(column: &ColumnInfo) -> String {
    let nullable = if column.nullable() { "NULL" } else { "NOT NULL" };
    let default = match column.column_default.as_deref() {
        Some(expr) if !expr.is_empty() => format!(" DEFAULT {}", expr),
        _ => String::new(),
    };
    format!(
        "    • {}: {} {}{}",
        column.column_name, column.data_type, nullable, default
    )
}

fn quoted_or_null(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("'{}'", v),
        None => "NULL".to_string(),
    }
}

pub fn banner(config: &Config, now: NaiveDateTime) -> Vec<String> {
    vec![
        "🔍 JobScraps Backend Discovery".to_string(),
        "=".repeat(50),
        format!("Timestamp: {}", now.format(TIMESTAMP_FORMAT)),
        format!("Database: {}", config.database_target()),
        format!("PostgREST: {}", config.gateway_url),
        String::new(),
    ]
}

pub fn connection_failure(error: &DiscoveryError) -> Vec<String> {
    vec![
        format!("❌ Database connection failed: {}", error),
        "💡 Check the DATABASE_URL credentials and ensure PostgreSQL is running".to_string(),
    ]
}

pub fn overview(result: &Result<DatabaseOverview, DiscoveryError>) -> Vec<String> {
    let mut lines = vec!["🗄️  === DATABASE OVERVIEW ===".to_string()];
    match result {
        Ok(overview) => {
            lines.push(format!("PostgreSQL Version: {}", overview.version));
            lines.push(format!("Database Size: {}", overview.size));
            lines.push(match overview.total_jobs {
                Lookup::Found(n) => format!("Total Jobs: {}", format_count(n)),
                Lookup::NotFound => format!("Total Jobs: Table '{}' not found", JOBS_TABLE),
            });
            lines.push(match overview.excluded_jobs {
                Lookup::Found(n) => format!("Excluded Jobs: {}", format_count(n)),
                Lookup::NotFound => {
                    format!("Excluded Jobs: Table '{}' not found", METADATA_TABLE)
                }
            });
        }
        Err(e) => lines.push(format!("❌ Error reading database overview: {}", e)),
    }
    lines
}

pub fn schema_inventory(result: &Result<Vec<CatalogEntry>, DiscoveryError>) -> Vec<String> {
    let mut lines = vec![String::new(), "📋 === TABLES & VIEWS INVENTORY ===".to_string()];
    match result {
        Ok(entries) => {
            for entry in entries {
                lines.push(format!(
                    "{} {} ({})",
                    entry.kind.icon(),
                    entry.name,
                    entry.kind.as_str()
                ));
                lines.extend(entry.columns.iter().map(column_line));
                lines.push(String::new());
            }
        }
        Err(e) => lines.push(format!("❌ Error reading schema catalog: {}", e)),
    }
    lines
}

pub fn computed_columns(report: &ComputedColumns) -> Vec<String> {
    let mut lines = vec!["🧮 === COMPUTED COLUMNS TEST ===".to_string()];
    for probe in &report.functions {
        lines.push(match &probe.result {
            Ok(value) => format!(
                "✅ {}('{}') function available: {}",
                probe.function,
                probe.sample,
                quoted_or_null(value.as_deref())
            ),
            Err(e) => format!(
                "❌ {}('{}') function not available: {}",
                probe.function, probe.sample, e
            ),
        });
    }
    lines.push(match &report.view {
        ViewProbe::Populated {
            job_role,
            location_scope,
        } => format!(
            "✅ Computed columns in {}: job_role={}, location_scope={}",
            PRIMARY_VIEW,
            quoted_or_null(job_role.as_deref()),
            quoted_or_null(location_scope.as_deref())
        ),
        ViewProbe::Empty => format!("⚠️  {} view exists but returned no data", PRIMARY_VIEW),
        ViewProbe::Unavailable(e) => {
            format!("❌ Computed columns not available in {}: {}", PRIMARY_VIEW, e)
        }
    });
    lines
}

pub fn exclusion_tracking(result: &Result<ExclusionTracking, DiscoveryError>) -> Vec<String> {
    let mut lines = vec![String::new(), "📊 === JSONB EXCLUSION TRACKING ===".to_string()];
    match result {
        Ok(ExclusionTracking::ColumnMissing) => {
            lines.push(format!(
                "❌ exclusion_sources column not found in {}",
                METADATA_TABLE
            ));
        }
        Ok(ExclusionTracking::Tracked { patterns, stats }) => {
            lines.push("✅ exclusion_sources JSONB column found".to_string());
            if patterns.is_empty() {
                lines.push("⚠️  No exclusion_sources data found".to_string());
            } else {
                lines.push(String::new());
                lines.push("Top exclusion source patterns:".to_string());
                for pattern in patterns {
                    lines.push(format!(
                        "  {} → {} jobs",
                        pattern.sources,
                        format_count(pattern.count)
                    ));
                }
            }
            lines.push(String::new());
            lines.push("Session tracking stats:".to_string());
            lines.push(format!(
                "  Total metadata records: {}",
                format_count(stats.total_metadata)
            ));
            lines.push(format!(
                "  With session_id: {}",
                format_count(stats.with_session_id)
            ));
            lines.push(format!(
                "  With applied_at timestamp: {}",
                format_count(stats.with_applied_at)
            ));
        }
        Err(e) => lines.push(format!("❌ Error analyzing JSONB exclusions: {}", e)),
    }
    lines
}

pub fn session_tracking(result: &Result<SessionTracking, DiscoveryError>) -> Vec<String> {
    let mut lines = vec![String::new(), "📝 === SESSION TRACKING ===".to_string()];
    let tracking = match result {
        Ok(tracking) => tracking,
        Err(e) => {
            lines.push(format!("❌ Error testing session tracking: {}", e));
            return lines;
        }
    };

    if tracking.sessions.is_empty() {
        lines.push("⚠️  No recent sessions found".to_string());
    } else {
        lines.push("Recent sessions (last 30 days):".to_string());
        for session in &tracking.sessions {
            lines.push(format!(
                "  {} Session {}: {} ({})",
                session.status().icon(),
                session.id,
                session.start_time.format(TIMESTAMP_FORMAT),
                duration_label(session)
            ));
        }
    }

    if !tracking.history.is_empty() {
        lines.push(String::new());
        lines.push("Recent search history:".to_string());
        for entry in &tracking.history {
            let inserted = entry
                .new_jobs_inserted
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string());
            let duration = entry
                .duration_seconds
                .map(|d| d.to_string())
                .unwrap_or_else(|| "?".to_string());
            lines.push(format!(
                "  '{}' → {} new jobs ({}s)",
                entry.search_query.as_deref().unwrap_or(""),
                inserted,
                duration
            ));
        }
    }
    lines
}

pub fn gateway_endpoints(
    base_url: &str,
    section: &GatewaySection<Result<Vec<EndpointProbe>, DiscoveryError>>,
) -> Vec<String> {
    let mut lines = vec![String::new(), "🌐 === POSTGREST ENDPOINTS ===".to_string()];
    let result = match section {
        GatewaySection::Unavailable => {
            lines.push(format!("❌ PostgREST not available at {}", base_url));
            lines.push("💡 Start PostgREST with: postgrest postgrest.conf".to_string());
            return lines;
        }
        GatewaySection::Probed(result) => result,
    };

    lines.push("✅ PostgREST API available".to_string());
    match result {
        Ok(probes) => {
            lines.push(String::new());
            lines.push("Testing key endpoints:".to_string());
            for probe in probes {
                lines.extend(endpoint_lines(probe));
            }
        }
        Err(e) => lines.push(format!("❌ Error listing gateway endpoints: {}", e)),
    }
    lines
}

pub fn endpoint_lines(probe: &EndpointProbe) -> Vec<String> {
    let endpoint = &probe.endpoint;
    match &probe.outcome {
        EndpointOutcome::NotInSchema => {
            vec![format!("  ❌ /{} → Table/view not found", endpoint)]
        }
        EndpointOutcome::Rows { count, fields } => {
            let mut lines = vec![format!("  ✅ /{} → {} record(s)", endpoint, count)];
            if let Some(fields) = fields {
                lines.push(format!("      Fields: {}", field_preview(fields)));
            }
            lines
        }
        EndpointOutcome::BadStatus(status) => {
            vec![format!("  ❌ /{} → HTTP {}", endpoint, status)]
        }
        EndpointOutcome::RequestFailed(e) => vec![format!("  ❌ /{} → {}", endpoint, e)],
    }
}

pub fn query_capabilities(section: &GatewaySection<Vec<CapabilityProbe>>) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        "🔍 === ADVANCED QUERY CAPABILITIES ===".to_string(),
    ];
    let probes = match section {
        GatewaySection::Unavailable => return lines,
        GatewaySection::Probed(probes) => probes,
    };

    lines.push("Testing advanced PostgREST queries:".to_string());
    for probe in probes {
        let query = &probe.query;
        lines.push(match &probe.outcome {
            QueryOutcome::Rows(count) => {
                format!("  ✅ {} → {} {}", query.label, count, query.unit)
            }
            QueryOutcome::BadStatus(status) => {
                format!("  ⚠️  {} returned HTTP {}", query.short_label, status)
            }
            QueryOutcome::Failed(e) => format!("  ❌ {} failed: {}", query.short_label, e),
        });
    }
    lines
}

pub fn frontend_config(config: &FrontendConfig) -> serde_json::Result<Vec<String>> {
    let mut lines = vec![
        String::new(),
        "⚙️  === FRONTEND CONFIGURATION RECOMMENDATIONS ===".to_string(),
    ];
    lines.push(config.to_pretty_json()?);
    Ok(lines)
}

pub fn closing() -> Vec<String> {
    vec![
        String::new(),
        "🎉 === DISCOVERY COMPLETE ===".to_string(),
        "💡 Use this information to design your frontend capabilities!".to_string(),
        "📋 Feed the relevant artifacts to your frontend development session.".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::CAPABILITY_QUERIES;
    use crate::models::{ExclusionPattern, ExclusionStats, RelationKind};
    use chrono::NaiveDate;
    use serde_json::json;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(8, 15, 30)
            .unwrap()
    }

    fn session(id: &str, end_secs: Option<f64>, status: &str) -> SearchSession {
        SearchSession {
            id: id.to_string(),
            start_time: start(),
            end_time: end_secs
                .map(|s| start() + chrono::Duration::milliseconds((s * 1000.0) as i64)),
            status: Some(status.to_string()),
            duration_seconds: Some(end_secs.unwrap_or(99.0)),
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(444_123), "444,123");
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_count(-12_345), "-12,345");
    }

    #[test]
    fn test_duration_label() {
        assert_eq!(duration_label(&session("1", None, "running")), "ongoing");
        assert_eq!(duration_label(&session("2", Some(12.345), "completed")), "12.3s");
    }

    #[test]
    fn test_field_preview_truncates() {
        let few: Vec<String> = ["id", "title"].iter().map(|s| s.to_string()).collect();
        assert_eq!(field_preview(&few), "id, title");

        let many: Vec<String> = (1..=10).map(|i| format!("f{}", i)).collect();
        assert_eq!(field_preview(&many), "f1, f2, f3, f4, f5, f6, f7, f8...");

        let exactly_eight: Vec<String> = (1..=8).map(|i| format!("f{}", i)).collect();
        assert!(!field_preview(&exactly_eight).ends_with("..."));
    }

    #[test]
    fn test_column_line() {
        let column = ColumnInfo {
            column_name: "exclusion_sources".to_string(),
            data_type: "jsonb".to_string(),
            is_nullable: "YES".to_string(),
            column_default: Some("'[]'::jsonb".to_string()),
        };
        assert_eq!(
            column_line(&column),
            "    • exclusion_sources: jsonb NULL DEFAULT '[]'::jsonb"
        );

        let column = ColumnInfo {
            column_name: "id".to_string(),
            data_type: "integer".to_string(),
            is_nullable: "NO".to_string(),
            column_default: None,
        };
        assert_eq!(column_line(&column), "    • id: integer NOT NULL");
    }

    #[test]
    fn test_overview_missing_tables() {
        let result = Ok(DatabaseOverview {
            version: "PostgreSQL 16.2 on x86_64-pc-linux-gnu".to_string(),
            size: "512 MB".to_string(),
            total_jobs: Lookup::Found(444_000),
            excluded_jobs: Lookup::NotFound,
        });
        let lines = overview(&result);
        assert!(lines.contains(&"Total Jobs: 444,000".to_string()));
        assert!(lines.contains(&"Excluded Jobs: Table 'job_user_metadata' not found".to_string()));
    }

    #[test]
    fn test_schema_inventory_lists_each_entry_once() {
        let entries = vec![
            CatalogEntry {
                name: "scraped_jobs".to_string(),
                kind: RelationKind::BaseTable,
                columns: vec![ColumnInfo {
                    column_name: "id".to_string(),
                    data_type: "integer".to_string(),
                    is_nullable: "NO".to_string(),
                    column_default: None,
                }],
            },
            CatalogEntry {
                name: "job_board_main".to_string(),
                kind: RelationKind::View,
                columns: vec![],
            },
        ];
        let lines = schema_inventory(&Ok(entries));
        assert_eq!(
            lines.iter().filter(|l| l.contains("scraped_jobs (BASE TABLE)")).count(),
            1
        );
        assert!(lines.contains(&"👁️ job_board_main (VIEW)".to_string()));
        assert!(lines.contains(&"    • id: integer NOT NULL".to_string()));
    }

    #[test]
    fn test_exclusion_patterns_keep_order_and_counts() {
        let result = Ok(ExclusionTracking::Tracked {
            patterns: vec![
                ExclusionPattern {
                    sources: json!(["manual"]),
                    count: 7,
                },
                ExclusionPattern {
                    sources: json!(["manual", "duplicate"]),
                    count: 3,
                },
            ],
            stats: ExclusionStats {
                total_metadata: 15,
                with_session_id: 4,
                with_applied_at: 10,
            },
        });
        let lines = exclusion_tracking(&result);
        let first = lines
            .iter()
            .position(|l| l == "  [\"manual\"] → 7 jobs")
            .unwrap();
        let second = lines
            .iter()
            .position(|l| l == "  [\"manual\",\"duplicate\"] → 3 jobs")
            .unwrap();
        assert!(first < second);
        assert!(lines.contains(&"  Total metadata records: 15".to_string()));
    }

    #[test]
    fn test_exclusion_column_missing_stops_early() {
        let lines = exclusion_tracking(&Ok(ExclusionTracking::ColumnMissing));
        assert!(lines.last().unwrap().contains("column not found"));
        assert!(!lines.iter().any(|l| l.contains("Session tracking stats")));
    }

    #[test]
    fn test_session_lines() {
        let tracking = SessionTracking {
            sessions: vec![
                session("7", Some(12.345), "completed"),
                session("8", None, "pending"),
            ],
            history: vec![],
        };
        let lines = session_tracking(&Ok(tracking));
        assert!(lines.contains(&"  ✅ Session 7: 2026-10-17 08:15:30 (12.3s)".to_string()));
        assert!(lines.contains(&"  ⏳ Session 8: 2026-10-17 08:15:30 (ongoing)".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Recent search history")));
    }

    #[test]
    fn test_endpoint_bad_status_distinct_from_not_found() {
        let bad = endpoint_lines(&EndpointProbe {
            endpoint: "job_details".to_string(),
            outcome: EndpointOutcome::BadStatus(404),
        });
        assert_eq!(bad, vec!["  ❌ /job_details → HTTP 404".to_string()]);

        let missing = endpoint_lines(&EndpointProbe {
            endpoint: "job_details".to_string(),
            outcome: EndpointOutcome::NotInSchema,
        });
        assert_eq!(
            missing,
            vec!["  ❌ /job_details → Table/view not found".to_string()]
        );
    }

    #[test]
    fn test_unavailable_gateway_sections() {
        let lines = gateway_endpoints("http://127.0.0.1:3001", &GatewaySection::Unavailable);
        assert!(lines.contains(&"❌ PostgREST not available at http://127.0.0.1:3001".to_string()));

        let lines = query_capabilities(&GatewaySection::Unavailable);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_computed_column_lines_show_sample_argument() {
        let report = ComputedColumns {
            functions: vec![
                crate::models::FunctionProbe {
                    function: "extract_job_role",
                    sample: "Data Analyst Remote",
                    result: Ok(Some("Data Analyst".to_string())),
                },
                crate::models::FunctionProbe {
                    function: "classify_location_scope",
                    sample: "Boulder, CO",
                    result: Err(DiscoveryError::Gateway(
                        "function classify_location_scope(text) does not exist".to_string(),
                    )),
                },
            ],
            view: ViewProbe::Empty,
        };
        let lines = computed_columns(&report);
        assert!(lines.contains(
            &"✅ extract_job_role('Data Analyst Remote') function available: 'Data Analyst'"
                .to_string()
        ));
        assert!(lines.contains(
            &"❌ classify_location_scope('Boulder, CO') function not available: function classify_location_scope(text) does not exist"
                .to_string()
        ));
        assert!(lines.contains(&"⚠️  job_board_main view exists but returned no data".to_string()));
    }

    #[test]
    fn test_capability_lines() {
        let probes = vec![
            CapabilityProbe {
                query: CAPABILITY_QUERIES[0],
                outcome: QueryOutcome::Rows(1),
            },
            CapabilityProbe {
                query: CAPABILITY_QUERIES[1],
                outcome: QueryOutcome::BadStatus(400),
            },
            CapabilityProbe {
                query: CAPABILITY_QUERIES[2],
                outcome: QueryOutcome::Failed("timed out".to_string()),
            },
        ];
        let lines = query_capabilities(&GatewaySection::Probed(probes));
        assert!(lines.contains(&"  ✅ JSONB containment query → 1 manual exclusions found".to_string()));
        assert!(lines.contains(&"  ⚠️  Computed column query returned HTTP 400".to_string()));
        assert!(lines.contains(&"  ❌ Full-text search failed: timed out".to_string()));
    }
}
