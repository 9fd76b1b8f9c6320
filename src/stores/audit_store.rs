use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::errors::internal::AuditError;
use crate::errors::InternalError;
use crate::types::db::admin_log;
use crate::types::internal::audit::AuditEntry;

/// Repository for the append-only admin log in the audit database
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    /// Create a new AuditStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append one entry to the admin log
    ///
    /// Serializes the detail map to JSON and inserts the row. There is no
    /// update or delete path for this table.
    ///
    /// # Errors
    /// Returns `InternalError` if serialization or the insert fails
    pub async fn write_entry(&self, entry: AuditEntry) -> Result<(), InternalError> {
        let data_json = serde_json::to_string(&entry.data).map_err(AuditError::Serialization)?;

        let row = admin_log::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            timestamp: Set(Utc::now().to_rfc3339()),
            action: Set(entry.action.to_string()),
            admin_id: Set(entry.admin_id),
            target_user_id: Set(entry.target_user_id),
            ip_address: Set(entry.ip_address),
            data: Set(data_json),
        };

        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("write_admin_log", e))?;

        Ok(())
    }
}
