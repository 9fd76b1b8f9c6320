use std::collections::HashMap;
use std::fmt;

/// Privileged actions recorded in the admin audit log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    CreateUser,
    UpdateUser,
    DeactivateUser,
    ResetPassword,
    RotateApiKey,
}

impl AdminAction {
    /// String representation stored in the admin_logs table
    pub fn as_str(&self) -> &str {
        match self {
            Self::CreateUser => "create_user",
            Self::UpdateUser => "update_user",
            Self::DeactivateUser => "deactivate_user",
            Self::ResetPassword => "reset_password",
            Self::RotateApiKey => "rotate_api_key",
        }
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit entry structure for building and storing admin log rows
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub action: AdminAction,
    pub admin_id: String,
    pub target_user_id: Option<String>,
    pub ip_address: Option<String>,
    pub data: HashMap<String, serde_json::Value>,
}

impl AuditEntry {
    /// Create a new audit entry for the given action and acting admin
    pub fn new(action: AdminAction, admin_id: impl Into<String>) -> Self {
        Self {
            action,
            admin_id: admin_id.into(),
            target_user_id: None,
            ip_address: None,
            data: HashMap::new(),
        }
    }

    pub fn target(mut self, target_user_id: impl Into<String>) -> Self {
        self.target_user_id = Some(target_user_id.into());
        self
    }

    pub fn ip(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }

    pub fn detail(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }
}
