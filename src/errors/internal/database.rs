use thiserror::Error;

/// Infrastructure errors from the document store
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database operation '{operation}' failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },
}
