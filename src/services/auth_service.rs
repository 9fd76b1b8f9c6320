use std::sync::Arc;

use crate::errors::AuthError;
use crate::providers::crypto_provider::mask_key;
use crate::providers::{Mailer, TokenProvider};
use crate::services::validation::{is_valid_email, MIN_PASSWORD_LEN};
use crate::stores::{CredentialStore, NewUser, ResetTokenStore, UsageStore, UserStore, UserUpdate};
use crate::types::db::user;
use crate::types::dto::auth::{MaskedKeyResponse, SignupRequest, UpdateProfileRequest};
use crate::types::internal::auth::{Claims, Role};
use crate::types::internal::context::RequestContext;

/// A successful authentication: the session token plus the account it
/// belongs to
pub struct Session {
    pub access_token: String,
    pub expires_in: i64,
    pub account: user::Model,
}

/// Identity and self-service flows: signup, login, profile, passwords,
/// and the caller's own provider key
///
/// Every method takes the caller's `RequestContext` explicitly; nothing
/// here reads ambient identity state.
pub struct AuthService {
    user_store: Arc<UserStore>,
    usage_store: Arc<UsageStore>,
    credential_store: Arc<CredentialStore>,
    reset_token_store: Arc<ResetTokenStore>,
    token_provider: Arc<TokenProvider>,
    mailer: Arc<dyn Mailer>,
}

impl AuthService {
    pub fn new(
        user_store: Arc<UserStore>,
        usage_store: Arc<UsageStore>,
        credential_store: Arc<CredentialStore>,
        reset_token_store: Arc<ResetTokenStore>,
        token_provider: Arc<TokenProvider>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            user_store,
            usage_store,
            credential_store,
            reset_token_store,
            token_provider,
            mailer,
        }
    }

    fn require_auth<'a>(&self, ctx: &'a RequestContext) -> Result<&'a Claims, AuthError> {
        ctx.claims.as_ref().ok_or_else(AuthError::unauthenticated)
    }

    /// Self-signup: provisions the account and its empty usage record,
    /// then opens a session
    ///
    /// New signups always get the unprivileged role; admin accounts are
    /// only created through the directory service or bootstrap.
    pub async fn signup(&self, request: SignupRequest) -> Result<Session, AuthError> {
        if !is_valid_email(&request.email) {
            return Err(AuthError::validation("Invalid email address"));
        }
        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self.user_store.find_by_email(&request.email).await?.is_some() {
            return Err(AuthError::validation(
                "An account already exists for this email",
            ));
        }

        let account = self
            .user_store
            .create_login(NewUser {
                email: request.email,
                password: request.password,
                display_name: request.display_name,
                phone_number: request.phone_number,
                business_name: request.business_name.unwrap_or_default(),
                role: Role::User,
                agent_id: request.agent_id,
                created_by: None,
            })
            .await?;

        self.usage_store.init_empty(&account.id).await?;

        tracing::info!("New signup: {}", account.id);

        self.open_session(account).await
    }

    /// Verify credentials and open a session
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let account = self
            .user_store
            .verify_password(email, password)
            .await?
            .ok_or_else(AuthError::invalid_credentials)?;

        if !account.is_active {
            return Err(AuthError::account_disabled());
        }

        self.user_store.touch_last_login(&account.id).await?;

        tracing::debug!("Login: {}", account.id);

        self.open_session(account).await
    }

    /// Resolve the caller's own account record
    pub async fn whoami(&self, ctx: &RequestContext) -> Result<user::Model, AuthError> {
        let claims = self.require_auth(ctx)?;
        self.user_store
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(AuthError::unauthenticated)
    }

    /// Self-service profile update (display name, phone, business, agent
    /// filter). Role and active status are not reachable from here.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        request: UpdateProfileRequest,
    ) -> Result<user::Model, AuthError> {
        let claims = self.require_auth(ctx)?;

        let update = UserUpdate {
            display_name: request.display_name,
            phone_number: request.phone_number,
            business_name: request.business_name,
            agent_id: request.agent_id,
            ..Default::default()
        };
        if update.is_empty() {
            return Err(AuthError::validation("No fields to update"));
        }

        self.user_store
            .apply_update(&claims.sub, update, &claims.sub)
            .await?
            .ok_or_else(AuthError::unauthenticated)
    }

    /// Change the caller's password after re-verifying the current one
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let claims = self.require_auth(ctx)?;
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let verified = self
            .user_store
            .verify_password(&claims.email, current_password)
            .await?;
        if verified.is_none() {
            return Err(AuthError::invalid_credentials());
        }

        self.user_store
            .update_password(&claims.sub, new_password)
            .await?;

        tracing::info!("Password changed for {}", claims.sub);

        Ok(())
    }

    /// Start the reset flow for an email address
    ///
    /// Unknown or deactivated addresses are silently accepted so the
    /// endpoint does not leak which emails have accounts.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let Some(account) = self.user_store.find_by_email(email).await? else {
            tracing::debug!("Reset requested for unknown email");
            return Ok(());
        };
        if !account.is_active {
            return Ok(());
        }

        self.issue_reset_email(&account).await?;
        Ok(())
    }

    /// Complete the reset flow with a token from the email
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let token_hash = self.token_provider.hash_reset_token(token);
        let Some(user_id) = self.reset_token_store.consume(&token_hash).await? else {
            return Err(AuthError::validation(
                "Reset token is invalid or has expired",
            ));
        };

        self.user_store.update_password(&user_id, new_password).await?;

        tracing::info!("Password reset completed for {}", user_id);

        Ok(())
    }

    /// Store the caller's own provider API key (encrypted at rest)
    pub async fn set_own_api_key(
        &self,
        ctx: &RequestContext,
        api_key: &str,
    ) -> Result<(), AuthError> {
        let claims = self.require_auth(ctx)?;
        if api_key.trim().is_empty() {
            return Err(AuthError::validation("API key must not be empty"));
        }

        self.credential_store
            .set_credential(ctx, &claims.sub, api_key)
            .await?;
        Ok(())
    }

    /// Masked view of the caller's stored provider key
    pub async fn get_own_api_key_masked(
        &self,
        ctx: &RequestContext,
    ) -> Result<MaskedKeyResponse, AuthError> {
        let claims = self.require_auth(ctx)?;
        let credential = self
            .credential_store
            .get_credential(&claims.sub)
            .await?
            .ok_or_else(AuthError::credential_missing)?;

        Ok(MaskedKeyResponse {
            masked_key: mask_key(&credential.plaintext),
            last_updated: credential.last_updated,
        })
    }

    /// Generate, store, and mail a reset token for an account
    ///
    /// Mailer failures are logged and swallowed: the token row exists
    /// either way and the flow can be retried.
    async fn issue_reset_email(&self, account: &user::Model) -> Result<(), AuthError> {
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

    async fn open_session(&self, account: user::Model) -> Result<Session, AuthError> {
        let access_token = self
            .token_provider
            .issue_token(&account)
            .map_err(|e| AuthError::internal(format!("Failed to issue session token: {}", e)))?;

        Ok(Session {
            access_token,
            expires_in: self.token_provider.token_ttl_seconds(),
            account,
        })
    }
}
