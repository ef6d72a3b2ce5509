use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use super::PostgresConfig;
use crate::common::{DatabaseError, RetryConfig, retry_with_backoff};

pub async fn connect(config: &PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(config.connect_options()).await?;
    info!(
        max_connections = config.max_connections,
        "Connected to PostgreSQL"
    );
    Ok(db)
}

/// [`connect`] with exponential backoff; `None` uses [`RetryConfig::default`].
pub async fn connect_with_retry(
    config: PostgresConfig,
    retry: Option<RetryConfig>,
) -> Result<DatabaseConnection, DatabaseError> {
    retry_with_backoff(|| connect(&config), retry.unwrap_or_default())
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))
}

/// Apply every pending migration of `M`.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> Result<(), DatabaseError> {
    info!("Running {} database migrations", app_name);
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    info!("Migrations completed for {}", app_name);
    Ok(())
}

/// `SELECT 1` round trip, used by the readiness probe.
pub async fn ping(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    debug!("Pinging PostgreSQL");
    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
    db.query_one_raw(stmt)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;
    Ok(())
}
