use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::user;

/// A user account as exposed to the presentation layer. Never carries the
/// password hash.
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub phone_number: String,
    pub business_name: String,

    /// "user" or "admin"
    pub role: String,

    /// Soft-delete flag
    pub is_active: bool,

    /// Default conversation-list filter for this account
    pub agent_id: Option<String>,

    /// Unix timestamps
    pub created_at: i64,
    pub last_login: Option<i64>,
    pub updated_at: i64,
}

impl From<user::Model> for UserProfile {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            display_name: model.display_name,
            phone_number: model.phone_number,
            business_name: model.business_name,
            role: model.role,
            is_active: model.is_active,
            agent_id: model.agent_id,
            created_at: model.created_at,
            last_login: model.last_login,
            updated_at: model.updated_at,
        }
    }
}

/// Request model for admin user provisioning
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub display_name: String,
    pub phone_number: String,

    /// Optional; defaults to empty
    pub business_name: Option<String>,

    /// "user" or "admin"
    pub role: String,

    /// Default conversation-list filter for the new account
    pub agent_id: Option<String>,

    /// Provider API key to store (encrypted) for the new account
    pub api_key: String,

    /// Whether to send the welcome (password reset) email
    pub send_welcome_email: bool,
}

/// Request model for admin partial updates; absent fields are untouched
#[derive(Object, Debug, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub business_name: Option<String>,

    /// "user" or "admin"
    pub role: Option<String>,

    pub is_active: Option<bool>,
    pub agent_id: Option<String>,
}

/// Request model for the admin-triggered password reset email
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ResetUserPasswordRequest {
    pub email: String,
}
