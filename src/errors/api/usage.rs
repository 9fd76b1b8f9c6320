use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use super::ErrorBody;
use crate::errors::internal::{InternalError, ProviderError};

/// Usage aggregation error types
#[derive(ApiResponse, Debug)]
pub enum UsageError {
    /// No resolved identity
    #[oai(status = 401)]
    Unauthenticated(Json<ErrorBody>),

    /// Resolved identity lacks the admin capability
    #[oai(status = 403)]
    Forbidden(Json<ErrorBody>),

    /// No stored provider key for the required lookup
    #[oai(status = 404)]
    CredentialMissing(Json<ErrorBody>),

    /// Target user record absent
    #[oai(status = 404)]
    NotFound(Json<ErrorBody>),

    /// Third-party provider returned a non-success status
    #[oai(status = 502)]
    Provider(Json<ErrorBody>),

    /// Internal server error
    #[oai(status = 500)]
    Internal(Json<ErrorBody>),
}

impl UsageError {
    pub fn unauthenticated() -> Self {
        UsageError::Unauthenticated(Json(ErrorBody::new(
            "unauthenticated",
            "Authentication required",
            401,
        )))
    }

    pub fn forbidden() -> Self {
        UsageError::Forbidden(Json(ErrorBody::new(
            "forbidden",
            "Admin role required for this operation",
            403,
        )))
    }

    pub fn credential_missing(owner_id: &str) -> Self {
        UsageError::CredentialMissing(Json(ErrorBody::new(
            "credential_missing",
            format!("No provider API key is stored for user {}", owner_id),
            404,
        )))
    }

    pub fn not_found(user_id: &str) -> Self {
        UsageError::NotFound(Json(ErrorBody::new(
            "user_not_found",
            format!("User not found: {}", user_id),
            404,
        )))
    }

    /// Provider failure, carrying the upstream status code when known
    pub fn provider(e: &ProviderError) -> Self {
        let message = match e.status() {
            Some(status) => format!("Voice provider request failed with status {}", status),
            None => format!("Voice provider request failed: {}", e),
        };
        UsageError::Provider(Json(ErrorBody::new("provider_error", message, 502)))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        UsageError::Internal(Json(ErrorBody::new("internal_error", message, 500)))
    }

    pub fn decryption(message: impl Into<String>) -> Self {
        UsageError::Internal(Json(ErrorBody::new("decryption_error", message, 500)))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            UsageError::Unauthenticated(json)
            | UsageError::Forbidden(json)
            | UsageError::CredentialMissing(json)
            | UsageError::NotFound(json)
            | UsageError::Provider(json)
            | UsageError::Internal(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<InternalError> for UsageError {
    fn from(e: InternalError) -> Self {
        match e {
            InternalError::Provider(inner) => UsageError::provider(&inner),
            InternalError::Crypto(inner) => UsageError::decryption(inner.to_string()),
            other => UsageError::internal(other.to_string()),
        }
    }
}
