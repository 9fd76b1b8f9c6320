use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use super::ErrorBody;
use crate::errors::internal::InternalError;

/// Authentication and self-service profile error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// No resolved identity
    #[oai(status = 401)]
    Unauthenticated(Json<ErrorBody>),

    /// Email/password pair did not verify
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorBody>),

    /// Account has been deactivated
    #[oai(status = 403)]
    AccountDisabled(Json<ErrorBody>),

    /// No stored provider key for this account
    #[oai(status = 404)]
    CredentialMissing(Json<ErrorBody>),

    /// Malformed input
    #[oai(status = 400)]
    Validation(Json<ErrorBody>),

    /// Internal server error
    #[oai(status = 500)]
    Internal(Json<ErrorBody>),
}

impl AuthError {
    pub fn unauthenticated() -> Self {
        AuthError::Unauthenticated(Json(ErrorBody::new(
            "unauthenticated",
            "Authentication required",
            401,
        )))
    }

    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(ErrorBody::new(
            "invalid_credentials",
            "Invalid email or password",
            401,
        )))
    }

    pub fn account_disabled() -> Self {
        AuthError::AccountDisabled(Json(ErrorBody::new(
            "account_disabled",
            "This account has been deactivated",
            403,
        )))
    }

    pub fn credential_missing() -> Self {
        AuthError::CredentialMissing(Json(ErrorBody::new(
            "credential_missing",
            "No provider API key is stored for this account",
            404,
        )))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AuthError::Validation(Json(ErrorBody::new("validation_error", message, 400)))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AuthError::Internal(Json(ErrorBody::new("internal_error", message, 500)))
    }

    pub fn decryption(message: impl Into<String>) -> Self {
        AuthError::Internal(Json(ErrorBody::new("decryption_error", message, 500)))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AuthError::Unauthenticated(json)
            | AuthError::InvalidCredentials(json)
            | AuthError::AccountDisabled(json)
            | AuthError::CredentialMissing(json)
            | AuthError::Validation(json)
            | AuthError::Internal(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<InternalError> for AuthError {
    fn from(e: InternalError) -> Self {
        match e {
            InternalError::Crypto(inner) => AuthError::decryption(inner.to_string()),
            other => AuthError::internal(other.to_string()),
        }
    }
}
