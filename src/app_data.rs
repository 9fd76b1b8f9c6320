use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::config::{DatabaseConnections, SecretManager, Settings};
use crate::errors::InternalError;
use crate::providers::{CredentialCipher, Mailer, TokenProvider, VoiceProviderClient};
use crate::services::{AuthService, ConversationService, DirectoryService, UsageService};
use crate::stores::{AuditStore, CredentialStore, NewUser, ResetTokenStore, UsageStore, UserStore};
use crate::types::internal::auth::Role;
use crate::types::internal::context::RequestContext;

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once at startup and shared across the API
/// structs. Stores are wired bottom-up: the audit store first, since the
/// credential store logs rotations through it.
pub struct AppData {
    pub settings: Settings,
    pub connections: DatabaseConnections,
    pub token_provider: Arc<TokenProvider>,
    pub audit_logger: Arc<AuditLogger>,
    pub user_store: Arc<UserStore>,
    pub credential_store: Arc<CredentialStore>,
    pub usage_store: Arc<UsageStore>,
    pub auth_service: Arc<AuthService>,
    pub directory_service: Arc<DirectoryService>,
    pub usage_service: Arc<UsageService>,
    pub conversation_service: Arc<ConversationService>,
}

impl AppData {
    /// Initialize all stores, providers, and services
    ///
    /// Database connections should be connected and migrated before this
    /// is called.
    pub fn init(
        settings: Settings,
        secrets: &SecretManager,
        connections: DatabaseConnections,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        tracing::info!("Initializing application data...");

        let token_provider = Arc::new(TokenProvider::new(secrets.jwt_secret().to_string()));

        let audit_store = Arc::new(AuditStore::new(connections.audit.clone()));
        let audit_logger = Arc::new(AuditLogger::new(audit_store));

        let user_store = Arc::new(UserStore::new(
            connections.primary.clone(),
            secrets.password_pepper().to_string(),
        ));
        let credential_store = Arc::new(CredentialStore::new(
            connections.primary.clone(),
            CredentialCipher::new(secrets.credential_encryption_key()),
            audit_logger.clone(),
        ));
        let usage_store = Arc::new(UsageStore::new(connections.primary.clone()));
        let reset_token_store = Arc::new(ResetTokenStore::new(connections.primary.clone()));

        let voice_client = Arc::new(VoiceProviderClient::new(&settings.provider_base_url));

        let auth_service = Arc::new(AuthService::new(
            user_store.clone(),
            usage_store.clone(),
            credential_store.clone(),
            reset_token_store.clone(),
            token_provider.clone(),
            mailer.clone(),
        ));
        let directory_service = Arc::new(DirectoryService::new(
            user_store.clone(),
            credential_store.clone(),
            usage_store.clone(),
            reset_token_store,
            token_provider.clone(),
            mailer,
            audit_logger.clone(),
        ));
        let usage_service = Arc::new(UsageService::new(
            user_store.clone(),
            credential_store.clone(),
            usage_store.clone(),
            voice_client.clone(),
            settings.chars_per_minute,
        ));
        let conversation_service = Arc::new(ConversationService::new(
            user_store.clone(),
            credential_store.clone(),
            voice_client,
        ));

        tracing::info!("Application data initialized");

        Self {
            settings,
            connections,
            token_provider,
            audit_logger,
            user_store,
            credential_store,
            usage_store,
            auth_service,
            directory_service,
            usage_service,
            conversation_service,
        }
    }

    /// Provision the first admin account from configuration
    ///
    /// Runs at startup: a no-op when an active admin already exists or the
    /// bootstrap settings are absent.
    pub async fn bootstrap_admin(&self) -> Result<(), InternalError> {
        let (Some(email), Some(password)) = (
            self.settings.bootstrap_admin_email.clone(),
            self.settings.bootstrap_admin_password.clone(),
        ) else {
            return Ok(());
        };

        if self.user_store.admin_exists().await? {
            tracing::debug!("Admin account present, skipping bootstrap");
            return Ok(());
        }
        if self.user_store.find_by_email(&email).await?.is_some() {
            tracing::warn!("Bootstrap admin email already registered with a non-admin role");
            return Ok(());
        }

        let ctx = RequestContext::for_system("bootstrap");
        let account = self
            .user_store
            .create_login(NewUser {
                email,
                password,
                display_name: "Administrator".to_string(),
                phone_number: String::new(),
                business_name: String::new(),
                role: Role::Admin,
                agent_id: None,
                created_by: Some(ctx.actor_id.clone()),
            })
            .await?;
        self.usage_store.init_empty(&account.id).await?;

        tracing::info!("Bootstrap admin account created: {}", account.id);

        Ok(())
    }
}
