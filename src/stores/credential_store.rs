use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::errors::InternalError;
use crate::providers::CredentialCipher;
use crate::types::db::api_key::{self, Entity as ApiKey};
use crate::types::internal::context::RequestContext;

/// A decrypted provider key as handed to the service layer. Held only for
/// the duration of the request; never persisted in this form.
#[derive(Debug, Clone)]
pub struct DecryptedCredential {
    pub plaintext: String,
    pub last_updated: i64,
    pub updated_by: String,
}

/// Repository for per-user provider keys, encrypted at rest
pub struct CredentialStore {
    db: DatabaseConnection,
    cipher: CredentialCipher,
    audit_logger: Arc<AuditLogger>,
}

impl CredentialStore {
    pub fn new(
        db: DatabaseConnection,
        cipher: CredentialCipher,
        audit_logger: Arc<AuditLogger>,
    ) -> Self {
        Self {
            db,
            cipher,
            audit_logger,
        }
    }

    /// Encrypt and store a provider key for `owner_id`, overwriting any
    /// prior value
    ///
    /// When the actor is not the owner (privileged rotation) a
    /// `rotate_api_key` audit entry is appended, best-effort.
    pub async fn set_credential(
        &self,
        ctx: &RequestContext,
        owner_id: &str,
        plaintext: &str,
    ) -> Result<(), InternalError> {
        let ciphertext = self.cipher.encrypt(plaintext)?;
        let now = Utc::now().timestamp();

        let existing = ApiKey::find_by_id(owner_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_api_key", e))?;

        match existing {
            Some(model) => {
                let mut active: api_key::ActiveModel = model.into();
                active.ciphertext = Set(ciphertext);
                active.last_updated = Set(now);
                active.updated_by = Set(ctx.actor_id.clone());
                active
                    .update(&self.db)
                    .await
                    .map_err(|e| InternalError::database("update_api_key", e))?;
            }
            None => {
                let row = api_key::ActiveModel {
                    owner_id: Set(owner_id.to_string()),
                    ciphertext: Set(ciphertext),
                    last_updated: Set(now),
                    updated_by: Set(ctx.actor_id.clone()),
                };
                row.insert(&self.db)
                    .await
                    .map_err(|e| InternalError::database("insert_api_key", e))?;
            }
        }

        if ctx.actor_id != owner_id {
            self.audit_logger.log_credential_rotated(ctx, owner_id).await;
        }

        tracing::debug!("Provider key stored for user {}", owner_id);

        Ok(())
    }

    /// Load and decrypt the provider key for `owner_id`
    ///
    /// Returns `None` when no key is stored. A stored but unreadable
    /// ciphertext surfaces as `InternalError::Crypto`.
    pub async fn get_credential(
        &self,
        owner_id: &str,
    ) -> Result<Option<DecryptedCredential>, InternalError> {
        let Some(model) = ApiKey::find_by_id(owner_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_api_key", e))?
        else {
            return Ok(None);
        };

        let plaintext = self.cipher.decrypt(&model.ciphertext)?;

        Ok(Some(DecryptedCredential {
            plaintext,
            last_updated: model.last_updated,
            updated_by: model.updated_by,
        }))
    }
}
