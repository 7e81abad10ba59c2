//! Database connection setup.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::migrations::Migrator;

/// Open a connection pool for `dsn`.
///
/// # Errors
/// Returns an error if the database cannot be reached.
pub async fn connect(dsn: &str, max_connections: u32) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(dsn.to_owned());
    options
        .max_connections(max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    // Every in-memory SQLite connection is a separate database.
    if dsn.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    info!("Database connection established");
    Ok(db)
}

/// Apply all pending migrations.
///
/// # Errors
/// Returns an error if a migration fails.
pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
    info!("Running calculator database migrations");
    Migrator::up(db, None).await?;
    info!("Calculator database migrations completed successfully");
    Ok(())
}
