use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use super::ErrorBody;
use crate::errors::internal::{InternalError, ProviderError};

/// Conversation accessor error types
#[derive(ApiResponse, Debug)]
pub enum ConversationError {
    /// No resolved identity
    #[oai(status = 401)]
    Unauthenticated(Json<ErrorBody>),

    /// No stored provider key for this account
    #[oai(status = 404)]
    CredentialMissing(Json<ErrorBody>),

    /// Conversation absent at the provider
    #[oai(status = 404)]
    NotFound(Json<ErrorBody>),

    /// Third-party provider returned a non-success status
    #[oai(status = 502)]
    Provider(Json<ErrorBody>),

    /// Internal server error
    #[oai(status = 500)]
    Internal(Json<ErrorBody>),
}

impl ConversationError {
    pub fn unauthenticated() -> Self {
        ConversationError::Unauthenticated(Json(ErrorBody::new(
            "unauthenticated",
            "Authentication required",
            401,
        )))
    }

    pub fn credential_missing() -> Self {
        ConversationError::CredentialMissing(Json(ErrorBody::new(
            "credential_missing",
            "No provider API key is stored for this account",
            404,
        )))
    }

    pub fn not_found(conversation_id: &str) -> Self {
        ConversationError::NotFound(Json(ErrorBody::new(
            "conversation_not_found",
            format!(
                "Conversation {} was not found; it may have been deleted or your key may not have access to it",
                conversation_id
            ),
            404,
        )))
    }

    /// Provider failure, carrying the upstream status code when known
    pub fn provider(e: &ProviderError) -> Self {
        let message = match e.status() {
            Some(status) => format!("Voice provider request failed with status {}", status),
            None => format!("Voice provider request failed: {}", e),
        };
        ConversationError::Provider(Json(ErrorBody::new("provider_error", message, 502)))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ConversationError::Internal(Json(ErrorBody::new("internal_error", message, 500)))
    }

    pub fn decryption(message: impl Into<String>) -> Self {
        ConversationError::Internal(Json(ErrorBody::new("decryption_error", message, 500)))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            ConversationError::Unauthenticated(json)
            | ConversationError::CredentialMissing(json)
            | ConversationError::NotFound(json)
            | ConversationError::Provider(json)
            | ConversationError::Internal(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for ConversationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<InternalError> for ConversationError {
    fn from(e: InternalError) -> Self {
        match e {
            InternalError::Provider(inner) => ConversationError::provider(&inner),
            InternalError::Crypto(inner) => ConversationError::decryption(inner.to_string()),
            other => ConversationError::internal(other.to_string()),
        }
    }
}
