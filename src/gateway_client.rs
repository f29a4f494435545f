use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

use crate::errors::DiscoveryError;

/// What a gateway read returned.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResponse {
    /// HTTP 200 with a JSON array of records.
    Rows(Vec<Value>),
    /// Any other status. The body is discarded.
    Status(StatusCode),
}

/// Read-only client for the REST-over-SQL gateway (PostgREST).
#[derive(Clone)]
pub struct PostgrestClient {
    client: reqwest::Client,
    base_url: String,
}

impl PostgrestClient {
    /// Creates a new `PostgrestClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root URL of the gateway, without a trailing slash.
    /// * `timeout` - Applied to every request.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DiscoveryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DiscoveryError::Gateway(format!("Failed to create gateway client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the root path answers with HTTP 200. Network errors and
    /// timeouts count as unreachable.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => {
                let available = response.status() == StatusCode::OK;
                if !available {
                    tracing::warn!("Gateway root returned {}", response.status());
                }
                available
            }
            Err(e) => {
                tracing::warn!("Gateway unreachable at {}: {}", url, e);
                false
            }
        }
    }

    /// Fetches up to `limit` records from a table or view.
    ///
    /// # Arguments
    ///
    /// * `resource` - Table or view name.
    /// * `filters` - PostgREST filters as query pairs, e.g. `("job_role", "eq.General")`.
    /// * `limit` - Maximum number of rows.
    pub async fn select(
        &self,
        resource: &str,
        filters: &[(&str, &str)],
        limit: usize,
    ) -> Result<GatewayResponse, DiscoveryError> {
        let url = format!("{}/{}", self.base_url, resource);
        let limit = limit.to_string();
        tracing::debug!("GET {} filters={:?} limit={}", url, filters, limit);

        let response = self
            .client
            .get(&url)
            .query(filters)
            .query(&[("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| DiscoveryError::Gateway(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("GET /{} returned {}", resource, status);
            return Ok(GatewayResponse::Status(status));
        }

        let rows: Vec<Value> = response.json().await.map_err(|e| {
            DiscoveryError::Gateway(format!("Failed to parse /{} response: {}", resource, e))
        })?;

        Ok(GatewayResponse::Rows(rows))
    }
}
