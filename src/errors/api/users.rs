use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use super::ErrorBody;
use crate::errors::internal::InternalError;

/// User directory (admin) operation error types
#[derive(ApiResponse, Debug)]
pub enum UsersError {
    /// No resolved identity
    #[oai(status = 401)]
    Unauthenticated(Json<ErrorBody>),

    /// Resolved identity lacks the admin capability
    #[oai(status = 403)]
    Forbidden(Json<ErrorBody>),

    /// Requested user record absent
    #[oai(status = 404)]
    NotFound(Json<ErrorBody>),

    /// Malformed input
    #[oai(status = 400)]
    Validation(Json<ErrorBody>),

    /// Email already registered
    #[oai(status = 409)]
    Conflict(Json<ErrorBody>),

    /// Internal server error
    #[oai(status = 500)]
    Internal(Json<ErrorBody>),
}

impl UsersError {
    pub fn unauthenticated() -> Self {
        UsersError::Unauthenticated(Json(ErrorBody::new(
            "unauthenticated",
            "Authentication required",
            401,
        )))
    }

    pub fn forbidden() -> Self {
        UsersError::Forbidden(Json(ErrorBody::new(
            "forbidden",
            "Admin role required for this operation",
            403,
        )))
    }

    pub fn not_found(user_id: &str) -> Self {
        UsersError::NotFound(Json(ErrorBody::new(
            "user_not_found",
            format!("User not found: {}", user_id),
            404,
        )))
    }

    pub fn credential_missing(user_id: &str) -> Self {
        UsersError::NotFound(Json(ErrorBody::new(
            "credential_missing",
            format!("No provider API key is stored for user {}", user_id),
            404,
        )))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        UsersError::Validation(Json(ErrorBody::new("validation_error", message, 400)))
    }

    pub fn duplicate_email(email: &str) -> Self {
        UsersError::Conflict(Json(ErrorBody::new(
            "duplicate_email",
            format!("An account already exists for {}", email),
            409,
        )))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        UsersError::Internal(Json(ErrorBody::new("internal_error", message, 500)))
    }

    pub fn decryption(message: impl Into<String>) -> Self {
        UsersError::Internal(Json(ErrorBody::new("decryption_error", message, 500)))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            UsersError::Unauthenticated(json)
            | UsersError::Forbidden(json)
            | UsersError::NotFound(json)
            | UsersError::Validation(json)
            | UsersError::Conflict(json)
            | UsersError::Internal(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for UsersError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<InternalError> for UsersError {
    fn from(e: InternalError) -> Self {
        match e {
            InternalError::Crypto(inner) => UsersError::decryption(inner.to_string()),
            other => UsersError::internal(other.to_string()),
        }
    }
}
