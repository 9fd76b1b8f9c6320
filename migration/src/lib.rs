pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_directory_tables;
mod m20250601_000002_create_admin_logs;

/// Migrator for the primary database (users, api_keys, usage_data, reset_tokens)
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            m20250601_000001_create_directory_tables::Migration,
        )]
    }
}

/// Migrator for the dedicated audit database (admin_logs)
pub struct AuditMigrator;

#[async_trait::async_trait]
impl MigratorTrait for AuditMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250601_000002_create_admin_logs::Migration)]
    }
}
