use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::errors::UsersError;
use crate::providers::crypto_provider::{generate_one_time_password, mask_key};
use crate::providers::{Mailer, TokenProvider};
use crate::services::validation::is_valid_email;
use crate::stores::{CredentialStore, NewUser, ResetTokenStore, UsageStore, UserStore, UserUpdate};
use crate::types::db::user;
use crate::types::dto::auth::MaskedKeyResponse;
use crate::types::dto::user::{CreateUserRequest, UpdateUserRequest};
use crate::types::internal::auth::{Claims, Role};
use crate::types::internal::context::RequestContext;

/// Admin-gated CRUD over the user directory, including provisioning of a
/// new login with its credential and usage-tracking record
///
/// Every method requires the admin capability on the passed context and
/// fails with Forbidden otherwise; there is no self-service path here.
pub struct DirectoryService {
    user_store: Arc<UserStore>,
    credential_store: Arc<CredentialStore>,
    usage_store: Arc<UsageStore>,
    reset_token_store: Arc<ResetTokenStore>,
    token_provider: Arc<TokenProvider>,
    mailer: Arc<dyn Mailer>,
    audit_logger: Arc<AuditLogger>,
}

impl DirectoryService {
    pub fn new(
        user_store: Arc<UserStore>,
        credential_store: Arc<CredentialStore>,
        usage_store: Arc<UsageStore>,
        reset_token_store: Arc<ResetTokenStore>,
        token_provider: Arc<TokenProvider>,
        mailer: Arc<dyn Mailer>,
        audit_logger: Arc<AuditLogger>,
    ) -> Self {
        Self {
            user_store,
            credential_store,
            usage_store,
            reset_token_store,
            token_provider,
            mailer,
            audit_logger,
        }
    }

    fn require_admin<'a>(&self, ctx: &'a RequestContext) -> Result<&'a Claims, UsersError> {
        let claims = ctx.claims.as_ref().ok_or_else(UsersError::unauthenticated)?;
        if !claims.is_admin() {
            return Err(UsersError::forbidden());
        }
        Ok(claims)
    }

    /// All user accounts, including deactivated ones
    pub async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<user::Model>, UsersError> {
        self.require_admin(ctx)?;
        Ok(self.user_store.list_all().await?)
    }

    /// One user account by id
    pub async fn get_user(
        &self,
        ctx: &RequestContext,
        user_id: &str,
    ) -> Result<user::Model, UsersError> {
        self.require_admin(ctx)?;
        self.user_store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| UsersError::not_found(user_id))
    }

    /// Provision a new account: login identity, encrypted credential, and
    /// empty usage record, in that order
    ///
    /// The sequence is not atomic. A failure after the login row is
    /// written leaves an account without credential or usage record; it
    /// surfaces as CredentialMissing on first use and is repaired by
    /// re-setting the key.
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        request: CreateUserRequest,
    ) -> Result<user::Model, UsersError> {
        self.require_admin(ctx)?;

        if !is_valid_email(&request.email) {
            return Err(UsersError::validation("Invalid email address"));
        }
        let role = Role::parse(&request.role)
            .ok_or_else(|| UsersError::validation("Role must be 'user' or 'admin'"))?;
        if request.api_key.trim().is_empty() {
            return Err(UsersError::validation("API key must not be empty"));
        }
        if self.user_store.find_by_email(&request.email).await?.is_some() {
            return Err(UsersError::duplicate_email(&request.email));
        }

        // The account holder never learns this password; they set their
        // own through the welcome (reset) email flow.
        let one_time_password = generate_one_time_password();

        let account = self
            .user_store
            .create_login(NewUser {
                email: request.email.clone(),
                password: one_time_password,
                display_name: request.display_name,
                phone_number: request.phone_number,
                business_name: request.business_name.unwrap_or_default(),
                role,
                agent_id: request.agent_id,
                created_by: Some(ctx.actor_id.clone()),
            })
            .await?;

        self.credential_store
            .set_credential(ctx, &account.id, &request.api_key)
            .await?;

        self.usage_store.init_empty(&account.id).await?;

        if request.send_welcome_email {
            self.send_reset_email(&account).await?;
        }

        self.audit_logger
            .log_user_created(
                ctx,
                &account.id,
                &account.email,
                &account.role,
                request.send_welcome_email,
            )
            .await;

        tracing::info!("User {} created by {}", account.id, ctx.actor_id);

        Ok(account)
    }

    /// Merge a partial update into a user record
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        request: UpdateUserRequest,
    ) -> Result<user::Model, UsersError> {
        self.require_admin(ctx)?;

        let role = match request.role {
            Some(raw) => Some(
                Role::parse(&raw)
                    .ok_or_else(|| UsersError::validation("Role must be 'user' or 'admin'"))?,
            ),
            None => None,
        };
        let update = UserUpdate {
            display_name: request.display_name,
            phone_number: request.phone_number,
            business_name: request.business_name,
            role,
            is_active: request.is_active,
            agent_id: request.agent_id,
        };
        if update.is_empty() {
            return Err(UsersError::validation("No fields to update"));
        }

        let updated_fields = update.field_names();
        let account = self
            .user_store
            .apply_update(user_id, update, &ctx.actor_id)
            .await?
            .ok_or_else(|| UsersError::not_found(user_id))?;

        self.audit_logger
            .log_user_updated(ctx, user_id, updated_fields)
            .await;

        tracing::info!("User {} updated by {}", user_id, ctx.actor_id);

        Ok(account)
    }

    /// Soft-delete a user account; the only deletion path
    pub async fn deactivate_user(
        &self,
        ctx: &RequestContext,
        user_id: &str,
    ) -> Result<(), UsersError> {
        self.require_admin(ctx)?;

        self.user_store
            .deactivate(user_id, &ctx.actor_id)
            .await?
            .ok_or_else(|| UsersError::not_found(user_id))?;

        self.audit_logger.log_user_deactivated(ctx, user_id).await;

        tracing::info!("User {} deactivated by {}", user_id, ctx.actor_id);

        Ok(())
    }

    /// Send a password reset email to an account, by email address
    pub async fn reset_user_password(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<(), UsersError> {
        self.require_admin(ctx)?;

        let account = self
            .user_store
            .find_by_email(email)
            .await?
            .ok_or_else(|| UsersError::not_found(email))?;

        self.send_reset_email(&account).await?;

        self.audit_logger.log_password_reset(ctx, &account.id).await;

        Ok(())
    }

    /// Rotate another account's provider key. The credential store appends
    /// the rotation audit entry since the actor is not the owner.
    pub async fn set_user_api_key(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        api_key: &str,
    ) -> Result<(), UsersError> {
        self.require_admin(ctx)?;

        if api_key.trim().is_empty() {
            return Err(UsersError::validation("API key must not be empty"));
        }
        if self.user_store.find_by_id(user_id).await?.is_none() {
            return Err(UsersError::not_found(user_id));
        }

        self.credential_store
            .set_credential(ctx, user_id, api_key)
            .await?;

        Ok(())
    }

    /// Masked view of another account's stored provider key
    pub async fn get_user_api_key(
        &self,
        ctx: &RequestContext,
        user_id: &str,
    ) -> Result<MaskedKeyResponse, UsersError> {
        self.require_admin(ctx)?;

        let credential = self
            .credential_store
            .get_credential(user_id)
            .await?
            .ok_or_else(|| UsersError::credential_missing(user_id))?;

        Ok(MaskedKeyResponse {
            masked_key: mask_key(&credential.plaintext),
            last_updated: credential.last_updated,
        })
    }

    async fn send_reset_email(&self, account: &user::Model) -> Result<(), UsersError> {
        let token = self.token_provider.generate_reset_token();
        let token_hash = self.token_provider.hash_reset_token(&token);
        let expires_at = self.token_provider.reset_token_expiry();

        self.reset_token_store
            .store(&account.id, &token_hash, expires_at)
            .await?;

        if let Err(e) = self.mailer.send_password_reset(&account.email, &token).await {
            tracing::warn!("Reset email delivery failed for {}: {}", account.id, e);
        }

        Ok(())
    }
}
