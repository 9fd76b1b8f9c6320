use thiserror::Error;

pub mod audit;
pub mod crypto;
pub mod database;
pub mod provider;

pub use audit::AuditError;
pub use crypto::CryptoError;
pub use database::DatabaseError;
pub use provider::ProviderError;

/// Internal error type for store and service operations
///
/// Infrastructure errors (database, crypto, provider) are shared across
/// stores. Never exposed over HTTP - the service layer converts each
/// variant into the appropriate API error.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse { value_type: String, message: String },
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: &str, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.to_string(),
            message: message.into(),
        }
    }
}
