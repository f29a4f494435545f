use std::io::Write;

use crate::catalog;
use crate::config::Config;
use crate::db::Database;
use crate::endpoints;
use crate::frontend_config::FrontendConfig;
use crate::gateway_client::PostgrestClient;
use crate::inspections;
use crate::models::GatewaySection;
use crate::report;

/// Runs every inspection in a fixed order and writes the report.
///
/// Inspection failures are rendered into the report, never returned. `run`
/// only fails when the output itself cannot be written.
pub struct Discovery<'a> {
    config: &'a Config,
    gateway: &'a PostgrestClient,
}

impl<'a> Discovery<'a> {
    pub fn new(config: &'a Config, gateway: &'a PostgrestClient) -> Self {
        Self { config, gateway }
    }

    pub async fn run<W: Write>(&self, db: &mut Database, out: &mut W) -> anyhow::Result<()> {
        let schema = self.config.db_schema.as_str();

        tracing::info!("Inspecting database overview");
        let overview = inspections::database_overview(db.conn()).await;
        write_lines(out, &report::overview(&overview))?;

        tracing::info!("Inspecting schema catalog ({})", schema);
        let inventory = catalog::load_catalog(db.conn(), schema).await;
        write_lines(out, &report::schema_inventory(&inventory))?;

        tracing::info!("Probing computed columns");
        let computed = inspections::computed_columns(db.conn()).await;
        write_lines(out, &report::computed_columns(&computed))?;

        tracing::info!("Analyzing exclusion tracking");
        let exclusions = inspections::exclusion_tracking(db.conn()).await;
        write_lines(out, &report::exclusion_tracking(&exclusions))?;

        tracing::info!("Reading session tracking");
        let sessions = inspections::session_tracking(db.conn()).await;
        write_lines(out, &report::session_tracking(&sessions))?;

        // Probed once; both gateway routines skip their body when it is down
        let gateway_up = self.gateway.is_available().await;
        tracing::info!("Gateway available: {}", gateway_up);

        let endpoint_section = if gateway_up {
            GatewaySection::Probed(
                match catalog::list_exposed_relations(db.conn(), schema).await {
                    Ok(exposed) => {
                        Ok(endpoints::probe_critical_endpoints(self.gateway, &exposed).await)
                    }
                    Err(e) => Err(e),
                },
            )
        } else {
            GatewaySection::Unavailable
        };
        write_lines(
            out,
            &report::gateway_endpoints(self.gateway.base_url(), &endpoint_section),
        )?;

        let capability_section = if gateway_up {
            GatewaySection::Probed(endpoints::probe_query_capabilities(self.gateway).await)
        } else {
            GatewaySection::Unavailable
        };
        write_lines(out, &report::query_capabilities(&capability_section))?;

        let frontend = FrontendConfig::recommended(&self.config.gateway_url);
        write_lines(out, &report::frontend_config(&frontend)?)?;

        write_lines(out, &report::closing())?;
        out.flush()?;
        Ok(())
    }
}

pub fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_lines() {
        let mut out = Vec::new();
        write_lines(&mut out, &["a".to_string(), String::new(), "b".to_string()]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\n\nb\n");
    }
}
