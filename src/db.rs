use sqlx::{Connection, PgConnection};

use crate::errors::DiscoveryError;

/// The single read-only connection used for a whole discovery run.
pub struct Database {
    conn: PgConnection,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, DiscoveryError> {
        let mut conn = PgConnection::connect(database_url).await?;

        // Fail fast on a connection that cannot serve queries
        sqlx::query("SELECT 1").execute(&mut conn).await?;

        Ok(Self { conn })
    }

    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    /// Closes the connection. Errors are logged, not returned, because the
    /// run is already over by the time this is called.
    pub async fn close(self) {
        if let Err(e) = self.conn.close().await {
            tracing::warn!("Failed to close database connection cleanly: {}", e);
        } else {
            tracing::debug!("Database connection closed");
        }
    }
}
