use serde_json::json;
use std::sync::Arc;

use crate::stores::AuditStore;
use crate::types::internal::audit::{AdminAction, AuditEntry};
use crate::types::internal::context::RequestContext;

/// Builds and records admin audit entries
///
/// All writes are best-effort: a failed audit write is logged through
/// tracing and never fails the business operation that triggered it.
pub struct AuditLogger {
    audit_store: Arc<AuditStore>,
}

impl AuditLogger {
    pub fn new(audit_store: Arc<AuditStore>) -> Self {
        Self { audit_store }
    }

    /// Log user creation by an admin
    pub async fn log_user_created(&self, ctx: &RequestContext, target_user_id: &str, email: &str, role: &str, send_welcome: bool) {
        let entry = self
            .entry(AdminAction::CreateUser, ctx)
            .target(target_user_id)
            .detail("email", json!(email))
            .detail("role", json!(role))
            .detail("send_welcome_email", json!(send_welcome));
        self.write_best_effort(entry).await;
    }

    /// Log a profile/role update, recording which fields changed
    pub async fn log_user_updated(&self, ctx: &RequestContext, target_user_id: &str, updated_fields: Vec<String>) {
        let entry = self
            .entry(AdminAction::UpdateUser, ctx)
            .target(target_user_id)
            .detail("updated_fields", json!(updated_fields));
        self.write_best_effort(entry).await;
    }

    /// Log a soft delete
    pub async fn log_user_deactivated(&self, ctx: &RequestContext, target_user_id: &str) {
        let entry = self
            .entry(AdminAction::DeactivateUser, ctx)
            .target(target_user_id)
            .detail("action", json!("User deactivated"));
        self.write_best_effort(entry).await;
    }

    /// Log an admin-triggered password reset email
    pub async fn log_password_reset(&self, ctx: &RequestContext, target_user_id: &str) {
        let entry = self
            .entry(AdminAction::ResetPassword, ctx)
            .target(target_user_id)
            .detail("action", json!("Password reset email sent"));
        self.write_best_effort(entry).await;
    }

    /// Log a privileged credential rotation (actor is not the key owner)
    pub async fn log_credential_rotated(&self, ctx: &RequestContext, owner_id: &str) {
        let entry = self
            .entry(AdminAction::RotateApiKey, ctx)
            .target(owner_id)
            .detail("action", json!("Provider API key rotated"));
        self.write_best_effort(entry).await;
    }

    fn entry(&self, action: AdminAction, ctx: &RequestContext) -> AuditEntry {
        AuditEntry::new(action, ctx.actor_id.clone())
            .ip(ctx.ip_address.map(|ip| ip.to_string()))
            .detail("request_id", json!(ctx.request_id.to_string()))
    }

    async fn write_best_effort(&self, entry: AuditEntry) {
        let action = entry.action.clone();
        if let Err(e) = self.audit_store.write_entry(entry).await {
            tracing::warn!("Failed to write audit entry for {}: {}", action, e);
        }
    }
}
