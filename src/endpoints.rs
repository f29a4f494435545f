//! Gateway endpoint and query-capability probes.

use crate::gateway_client::{GatewayResponse, PostgrestClient};
use crate::models::{
    CapabilityProbe, CapabilityQuery, EndpointOutcome, EndpointProbe, QueryOutcome,
};

/// Resources the frontend cannot work without.
pub const CRITICAL_ENDPOINTS: [&str; 4] = [
    "job_board_main",
    "job_details",
    "job_user_metadata",
    "scraped_jobs",
];

/// Endpoints whose first record's field names are listed.
pub const FIELD_PREVIEW_ENDPOINTS: [&str; 2] = ["job_board_main", "job_details"];

pub const CAPABILITY_QUERIES: [CapabilityQuery; 3] = [
    CapabilityQuery {
        resource: "job_user_metadata",
        filters: &[("exclusion_sources", "cs.[\"manual\"]")],
        label: "JSONB containment query",
        short_label: "JSONB query",
        unit: "manual exclusions found",
    },
    CapabilityQuery {
        resource: "job_board_main",
        filters: &[("job_role", "eq.General")],
        label: "Computed column filter (job_role)",
        short_label: "Computed column query",
        unit: "records",
    },
    CapabilityQuery {
        resource: "job_board_main",
        filters: &[("title", "ilike.*Engineer*")],
        label: "Full-text search (title)",
        short_label: "Full-text search",
        unit: "records",
    },
];

/// Fetches one row from each critical endpoint listed in `exposed`.
///
/// Endpoints missing from `exposed` are reported as `NotInSchema` without
/// any HTTP request.
pub async fn probe_critical_endpoints(
    client: &PostgrestClient,
    exposed: &[String],
) -> Vec<EndpointProbe> {
    let mut probes = Vec::with_capacity(CRITICAL_ENDPOINTS.len());

    for endpoint in CRITICAL_ENDPOINTS {
        let outcome = if !exposed.iter().any(|name| name == endpoint) {
            EndpointOutcome::NotInSchema
        } else {
            match client.select(endpoint, &[], 1).await {
                Ok(GatewayResponse::Rows(rows)) => {
                    let fields = if FIELD_PREVIEW_ENDPOINTS.contains(&endpoint) {
                        rows.first()
                            .and_then(|row| row.as_object())
                            .map(|record| record.keys().cloned().collect())
                    } else {
                        None
                    };
                    EndpointOutcome::Rows {
                        count: rows.len(),
                        fields,
                    }
                }
                Ok(GatewayResponse::Status(status)) => EndpointOutcome::BadStatus(status.as_u16()),
                Err(e) => EndpointOutcome::RequestFailed(e.to_string()),
            }
        };

        probes.push(EndpointProbe {
            endpoint: endpoint.to_string(),
            outcome,
        });
    }

    probes
}

pub async fn probe_query_capabilities(client: &PostgrestClient) -> Vec<CapabilityProbe> {
    let mut probes = Vec::with_capacity(CAPABILITY_QUERIES.len());

    for query in CAPABILITY_QUERIES {
        let outcome = match client.select(query.resource, query.filters, 1).await {
            Ok(GatewayResponse::Rows(rows)) => QueryOutcome::Rows(rows.len()),
            Ok(GatewayResponse::Status(status)) => QueryOutcome::BadStatus(status.as_u16()),
            Err(e) => {
                tracing::warn!("{} failed: {}", query.short_label, e);
                QueryOutcome::Failed(e.to_string())
            }
        };
        probes.push(CapabilityProbe { query, outcome });
    }

    probes
}
