use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use super::user::UserProfile;

/// Request model for self-signup
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub phone_number: String,
    pub business_name: Option<String>,
    pub agent_id: Option<String>,
}

/// Request model for login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response model carrying a session token and the resolved profile
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,

    pub user: UserProfile,
}

/// Request model for self-service profile updates
#[derive(Object, Debug, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub business_name: Option<String>,
    pub agent_id: Option<String>,
}

/// Request model for authenticated password change
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Request model for starting the password reset flow
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RequestResetRequest {
    pub email: String,
}

/// Request model for completing the password reset flow
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    /// Raw token as delivered by email
    pub token: String,
    pub new_password: String,
}

/// Request model for storing the caller's own provider key
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SetApiKeyRequest {
    pub api_key: String,
}

/// Masked view of a stored provider key
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct MaskedKeyResponse {
    /// Key with all but the last four characters replaced
    pub masked_key: String,

    /// Unix timestamp of the last rotation
    pub last_updated: i64,
}
