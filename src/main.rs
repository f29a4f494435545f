use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobscraps_discovery::config::Config;
use jobscraps_discovery::db::Database;
use jobscraps_discovery::discovery::{write_lines, Discovery};
use jobscraps_discovery::gateway_client::PostgrestClient;
use jobscraps_discovery::report;

/// Main entry point for the discovery run.
///
/// Loads configuration, prints the banner, connects to the database and runs
/// every inspection. Exits with status 1 when the database is unreachable;
/// any other failure is reported inline and the run still exits 0.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the report on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobscraps_discovery=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    let gateway = PostgrestClient::new(
        config.gateway_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?;

    let mut stdout = std::io::stdout();
    write_lines(
        &mut stdout,
        &report::banner(&config, chrono::Local::now().naive_local()),
    )?;

    let mut db = match Database::connect(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Database connection failed: {}", e);
            write_lines(&mut stdout, &report::connection_failure(&e))?;
            std::process::exit(1);
        }
    };
    tracing::info!("Connected to {}", config.database_target());

    let result = Discovery::new(&config, &gateway)
        .run(&mut db, &mut stdout)
        .await;

    // Released whether or not the run finished
    db.close().await;

    result
}
