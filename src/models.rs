use chrono::NaiveDateTime;
use serde_json::Value;
use sqlx::FromRow;

use crate::errors::DiscoveryError;

/// A count that may come from a table which does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseOverview {
    /// First comma-delimited segment of `version()`
    pub version: String,
    pub size: String,
    pub total_jobs: Lookup<i64>,
    pub excluded_jobs: Lookup<i64>,
}

// ============ Schema catalog ============

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationKind {
    BaseTable,
    View,
    Other(String),
}

impl RelationKind {
    pub fn from_table_type(table_type: &str) -> Self {
        match table_type {
            "BASE TABLE" => RelationKind::BaseTable,
            "VIEW" => RelationKind::View,
            other => RelationKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RelationKind::BaseTable => "BASE TABLE",
            RelationKind::View => "VIEW",
            RelationKind::Other(s) => s,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            RelationKind::View => "👁️",
            _ => "📁",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: String,
    pub column_default: Option<String>,
}

impl ColumnInfo {
    pub fn nullable(&self) -> bool {
        self.is_nullable == "YES"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub kind: RelationKind,
    /// Columns in ordinal order
    pub columns: Vec<ColumnInfo>,
}

// ============ Computed columns ============

#[derive(Debug)]
pub struct FunctionProbe {
    pub function: &'static str,
    pub sample: &'static str,
    pub result: Result<Option<String>, DiscoveryError>,
}

#[derive(Debug)]
pub enum ViewProbe {
    Populated {
        job_role: Option<String>,
        location_scope: Option<String>,
    },
    /// The view answered but holds no rows.
    Empty,
    Unavailable(DiscoveryError),
}

#[derive(Debug)]
pub struct ComputedColumns {
    pub functions: Vec<FunctionProbe>,
    pub view: ViewProbe,
}

// ============ Exclusion tracking ============

#[derive(Debug, Clone, PartialEq)]
pub struct ExclusionPattern {
    /// The whole `exclusion_sources` JSONB value shared by this group
    pub sources: Value,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExclusionStats {
    pub total_metadata: i64,
    pub with_session_id: i64,
    pub with_applied_at: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExclusionTracking {
    ColumnMissing,
    Tracked {
        /// Top patterns, most frequent first
        patterns: Vec<ExclusionPattern>,
        stats: ExclusionStats,
    },
}

// ============ Sessions ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Completed,
    Failed,
    Error,
    /// Anything else, including pending and unknown statuses
    Pending,
}

impl SessionStatus {
    pub fn parse(status: Option<&str>) -> Self {
        match status {
            Some("completed") => SessionStatus::Completed,
            Some("failed") => SessionStatus::Failed,
            Some("error") => SessionStatus::Error,
            _ => SessionStatus::Pending,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SessionStatus::Completed => "✅",
            SessionStatus::Failed => "❌",
            SessionStatus::Error => "💥",
            SessionStatus::Pending => "⏳",
        }
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SearchSession {
    pub id: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub status: Option<String>,
    /// Elapsed seconds, measured against the current time while ongoing
    pub duration_seconds: Option<f64>,
}

impl SearchSession {
    pub fn status(&self) -> SessionStatus {
        SessionStatus::parse(self.status.as_deref())
    }

    pub fn is_ongoing(&self) -> bool {
        self.end_time.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SearchHistoryEntry {
    pub search_query: Option<String>,
    pub new_jobs_inserted: Option<i64>,
    pub duration_seconds: Option<f64>,
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionTracking {
    pub sessions: Vec<SearchSession>,
    pub history: Vec<SearchHistoryEntry>,
}

// ============ Gateway ============

/// Result of a routine that needs the gateway to be reachable.
#[derive(Debug)]
pub enum GatewaySection<T> {
    Unavailable,
    Probed(T),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointOutcome {
    /// Not a table or view in the inspected schema, so never requested
    NotInSchema,
    Rows {
        count: usize,
        /// Field names of the first record, in gateway order, when previewed
        fields: Option<Vec<String>>,
    },
    BadStatus(u16),
    RequestFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointProbe {
    pub endpoint: String,
    pub outcome: EndpointOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Rows(usize),
    BadStatus(u16),
    Failed(String),
}

/// A fixed filtered query used to check one gateway capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityQuery {
    pub resource: &'static str,
    pub filters: &'static [(&'static str, &'static str)],
    /// Shown on success, e.g. "JSONB containment query"
    pub label: &'static str,
    /// Shown on failure, e.g. "JSONB query"
    pub short_label: &'static str,
    /// Noun following the row count on success
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityProbe {
    pub query: CapabilityQuery,
    pub outcome: QueryOutcome,
}
