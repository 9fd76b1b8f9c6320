use poem_openapi::Object;

pub mod auth;
pub mod conversations;
pub mod usage;
pub mod users;

pub use auth::AuthError;
pub use conversations::ConversationError;
pub use usage::UsageError;
pub use users::UsersError;

/// Standardized error response body for all endpoints
#[derive(Object, Debug)]
pub struct ErrorBody {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

impl ErrorBody {
    pub fn new(error: &str, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            status_code,
        }
    }
}
