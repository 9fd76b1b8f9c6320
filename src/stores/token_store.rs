use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::errors::InternalError;
use crate::types::db::reset_token::{self, Entity as ResetToken};

/// Repository for hashed one-time password reset tokens
pub struct ResetTokenStore {
    db: DatabaseConnection,
}

impl ResetTokenStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Store the hash of a freshly issued reset token
    pub async fn store(
        &self,
        user_id: &str,
        token_hash: &str,
        expires_at: i64,
    ) -> Result<(), InternalError> {
        let row = reset_token::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            token_hash: Set(token_hash.to_string()),
            user_id: Set(user_id.to_string()),
            expires_at: Set(expires_at),
            used: Set(false),
            created_at: Set(Utc::now().timestamp()),
        };
        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("store_reset_token", e))?;
        Ok(())
    }

    /// Consume a reset token by hash
    ///
    /// Returns the owning user id when the token exists, is unused and
    /// unexpired; marks it used in the same call. Returns `None` otherwise
    /// (absent, already used, or expired look identical to the caller).
    pub async fn consume(&self, token_hash: &str) -> Result<Option<String>, InternalError> {
        let Some(row) = ResetToken::find()
            .filter(reset_token::Column::TokenHash.eq(token_hash))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_reset_token", e))?
        else {
            return Ok(None);
        };

        if row.used || row.expires_at < Utc::now().timestamp() {
            return Ok(None);
        }

        let user_id = row.user_id.clone();
        let mut active: reset_token::ActiveModel = row.into();
        active.used = Set(true);
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("consume_reset_token", e))?;

        Ok(Some(user_id))
    }
}
