use thiserror::Error;

/// Errors that can occur during audit logging operations
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to serialize audit data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write audit entry: {0}")]
    Database(#[from] sea_orm::DbErr),
}
