//! Utility to print only the schema inventory of the configured database.

use jobscraps_discovery::catalog;
use jobscraps_discovery::config::Config;
use jobscraps_discovery::db::Database;
use jobscraps_discovery::discovery::write_lines;
use jobscraps_discovery::report;

/// Main entry point for the schema inspection utility.
///
/// Connects to the database, lists every table and view in the configured
/// schema with its columns, then closes the connection.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let mut db = Database::connect(&config.database_url).await?;

    let inventory = catalog::load_catalog(db.conn(), &config.db_schema).await;
    let written = write_lines(&mut std::io::stdout(), &report::schema_inventory(&inventory));

    db.close().await;

    written?;
    Ok(())
}
