use migration::{AuditMigrator, Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::config::Settings;
use crate::errors::InternalError;

/// The two database connections the service runs over: the primary store
/// (users, api_keys, usage_data, reset_tokens) and a dedicated audit store
/// (admin_logs).
pub struct DatabaseConnections {
    pub primary: DatabaseConnection,
    pub audit: DatabaseConnection,
}

impl DatabaseConnections {
    /// Connect both databases. Does NOT run migrations - call migrate()
    /// separately.
    pub async fn connect(settings: &Settings) -> Result<Self, InternalError> {
        let primary = Database::connect(&settings.database_url)
            .await
            .map_err(|e| InternalError::database("connect_primary_database", e))?;
        tracing::debug!("Connected to primary database: {}", settings.database_url);

        let audit = Database::connect(&settings.audit_database_url)
            .await
            .map_err(|e| InternalError::database("connect_audit_database", e))?;
        tracing::debug!("Connected to audit database: {}", settings.audit_database_url);

        Ok(Self { primary, audit })
    }

    /// Run all pending migrations on both databases
    pub async fn migrate(&self) -> Result<(), InternalError> {
        Migrator::up(&self.primary, None)
            .await
            .map_err(|e| InternalError::database("run_migrations", e))?;
        tracing::debug!("Primary database migrations completed");

        AuditMigrator::up(&self.audit, None)
            .await
            .map_err(|e| InternalError::database("run_audit_migrations", e))?;
        tracing::debug!("Audit database migrations completed");

        Ok(())
    }
}
