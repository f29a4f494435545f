use serde::Serialize;

/// Feature notes handed to the frontend, one per capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureNotes {
    pub jsonb_exclusion_tracking: &'static str,
    pub computed_columns: &'static str,
    pub session_tracking: &'static str,
    pub bulk_operations: &'static str,
    pub advanced_search: &'static str,
}

/// Recommended frontend configuration. Field order is the output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontendConfig {
    pub api_base: String,
    pub primary_view: &'static str,
    pub available_views: Vec<&'static str>,
    pub features: FeatureNotes,
    pub batch_update_endpoint: &'static str,
    pub export_endpoint: &'static str,
}

impl FrontendConfig {
    /// Builds the recommendation. Only `api_base` comes from the caller; the
    /// rest never changes between runs.
    pub fn recommended(api_base: &str) -> Self {
        Self {
            api_base: api_base.to_string(),
            primary_view: "job_board_main",
            available_views: vec![
                "job_board_main",
                "job_board_applied",
                "job_board_needs_review",
                "job_board_remote",
                "job_board_with_salary",
                "job_board_export",
            ],
            features: FeatureNotes {
                jsonb_exclusion_tracking: "Check if exclusion_sources column exists",
                computed_columns: "Check if job_role and location_scope are available",
                session_tracking: "Check if exclusion_session_id is populated",
                bulk_operations: "Use job_user_metadata for batch updates",
                advanced_search: "Full-text search on title, company, description",
            },
            batch_update_endpoint: "/job_user_metadata",
            export_endpoint: "/job_board_export",
        }
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_is_stable() {
        let first = FrontendConfig::recommended("http://127.0.0.1:3001");
        let second = FrontendConfig::recommended("http://127.0.0.1:3001");
        assert_eq!(first, second);
        assert_eq!(first.to_pretty_json().unwrap(), second.to_pretty_json().unwrap());
    }

    #[test]
    fn test_json_key_order() {
        let json = FrontendConfig::recommended("http://gateway:3001")
            .to_pretty_json()
            .unwrap();
        let keys = [
            "\"api_base\"",
            "\"primary_view\"",
            "\"available_views\"",
            "\"features\"",
            "\"batch_update_endpoint\"",
            "\"export_endpoint\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(json.contains("\"api_base\": \"http://gateway:3001\""));
        assert!(json.contains("\"export_endpoint\": \"/job_board_export\""));
    }

    #[test]
    fn test_available_views_include_primary() {
        let config = FrontendConfig::recommended("http://127.0.0.1:3001");
        assert!(config.available_views.contains(&config.primary_view));
        assert_eq!(config.available_views.len(), 6);
    }
}
