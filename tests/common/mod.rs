#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use migration::{AuditMigrator, Migrator, MigratorTrait};
use sea_orm::{ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use voicedash_backend::audit::AuditLogger;
use voicedash_backend::providers::mailer::MailerError;
use voicedash_backend::providers::{
    CredentialCipher, Mailer, TokenProvider, VoiceProviderClient,
};
use voicedash_backend::services::{
    AuthService, ConversationService, DirectoryService, UsageService,
};
use voicedash_backend::stores::{
    AuditStore, CredentialStore, NewUser, ResetTokenStore, UsageStore, UserStore,
};
use voicedash_backend::types::db::{admin_log, user};
use voicedash_backend::types::internal::auth::{Claims, Role};
use voicedash_backend::types::internal::context::RequestContext;

pub const TEST_PEPPER: &str = "test-pepper-16ch!";
pub const TEST_JWT_SECRET: &str = "a-jwt-signing-secret-of-32-chars!";
pub const TEST_ENCRYPTION_KEY: &str = "an-encryption-key-with-32-chars!!";

/// Base URL that fails fast if anything actually dials it; used by tests
/// that must not reach the provider.
pub const UNREACHABLE_PROVIDER: &str = "http://127.0.0.1:1";

/// Mailer that records deliveries instead of sending them
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// The raw token of the most recent delivery
    pub fn last_token(&self) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .last()
            .map(|(_, token)| token.clone())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_password_reset(&self, email: &str, token: &str) -> Result<(), MailerError> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }
}

/// Everything an integration test needs, wired over two in-memory SQLite
/// databases
pub struct TestBackend {
    pub primary_db: DatabaseConnection,
    pub audit_db: DatabaseConnection,
    pub user_store: Arc<UserStore>,
    pub credential_store: Arc<CredentialStore>,
    pub usage_store: Arc<UsageStore>,
    pub reset_token_store: Arc<ResetTokenStore>,
    pub token_provider: Arc<TokenProvider>,
    pub mailer: Arc<RecordingMailer>,
    pub auth_service: AuthService,
    pub directory_service: DirectoryService,
    pub usage_service: UsageService,
    pub conversation_service: ConversationService,
}

/// Wire a full backend against the given provider base URL
pub async fn setup_backend(provider_base_url: &str) -> TestBackend {
    let primary_db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    Migrator::up(&primary_db, None)
        .await
        .expect("Failed to run migrations");

    let audit_db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create audit database");
    AuditMigrator::up(&audit_db, None)
        .await
        .expect("Failed to run audit migrations");

    let audit_store = Arc::new(AuditStore::new(audit_db.clone()));
    let audit_logger = Arc::new(AuditLogger::new(audit_store));

    let user_store = Arc::new(UserStore::new(primary_db.clone(), TEST_PEPPER.to_string()));
    let credential_store = Arc::new(CredentialStore::new(
        primary_db.clone(),
        CredentialCipher::new(TEST_ENCRYPTION_KEY),
        audit_logger.clone(),
    ));
    let usage_store = Arc::new(UsageStore::new(primary_db.clone()));
    let reset_token_store = Arc::new(ResetTokenStore::new(primary_db.clone()));
    let token_provider = Arc::new(TokenProvider::new(TEST_JWT_SECRET.to_string()));
    let mailer = Arc::new(RecordingMailer::new());
    let voice_client = Arc::new(VoiceProviderClient::new(provider_base_url));

    let auth_service = AuthService::new(
        user_store.clone(),
        usage_store.clone(),
        credential_store.clone(),
        reset_token_store.clone(),
        token_provider.clone(),
        mailer.clone(),
    );
    let directory_service = DirectoryService::new(
        user_store.clone(),
        credential_store.clone(),
        usage_store.clone(),
        reset_token_store.clone(),
        token_provider.clone(),
        mailer.clone(),
        audit_logger.clone(),
    );
    let usage_service = UsageService::new(
        user_store.clone(),
        credential_store.clone(),
        usage_store.clone(),
        voice_client.clone(),
        1000.0,
    );
    let conversation_service = ConversationService::new(
        user_store.clone(),
        credential_store.clone(),
        voice_client,
    );

    TestBackend {
        primary_db,
        audit_db,
        user_store,
        credential_store,
        usage_store,
        reset_token_store,
        token_provider,
        mailer,
        auth_service,
        directory_service,
        usage_service,
        conversation_service,
    }
}

/// Backend for tests that never touch the provider
pub async fn setup_offline_backend() -> TestBackend {
    setup_backend(UNREACHABLE_PROVIDER).await
}

/// Create an active admin account directly through the store
pub async fn create_admin(backend: &TestBackend, email: &str) -> user::Model {
    backend
        .user_store
        .create_login(NewUser {
            email: email.to_string(),
            password: "admin-password-1".to_string(),
            display_name: "Admin".to_string(),
            phone_number: "555-0100".to_string(),
            business_name: String::new(),
            role: Role::Admin,
            agent_id: None,
            created_by: None,
        })
        .await
        .expect("Failed to create admin")
}

/// Create an active regular account directly through the store
pub async fn create_user(backend: &TestBackend, email: &str) -> user::Model {
    backend
        .user_store
        .create_login(NewUser {
            email: email.to_string(),
            password: "user-password-1".to_string(),
            display_name: "User".to_string(),
            phone_number: "555-0101".to_string(),
            business_name: String::new(),
            role: Role::User,
            agent_id: None,
            created_by: None,
        })
        .await
        .expect("Failed to create user")
}

/// Authenticated request context for an account
pub fn ctx_for(account: &user::Model) -> RequestContext {
    let now = chrono::Utc::now().timestamp();
    RequestContext::authenticated(Claims {
        sub: account.id.clone(),
        email: account.email.clone(),
        role: Role::from_db(&account.role),
        jti: uuid::Uuid::new_v4().to_string(),
        iat: now,
        exp: now + 3600,
    })
}

/// Context with no resolved identity
pub fn anonymous_ctx() -> RequestContext {
    RequestContext::for_system("test-anonymous")
}

/// Number of audit entries recorded for an action
pub async fn count_audit_entries(backend: &TestBackend, action: &str) -> usize {
    admin_log::Entity::find()
        .filter(admin_log::Column::Action.eq(action))
        .all(&backend.audit_db)
        .await
        .expect("Failed to query audit log")
        .len()
}

/// The most recent audit entry, if any
pub async fn latest_audit_entry(backend: &TestBackend) -> Option<admin_log::Model> {
    admin_log::Entity::find()
        .order_by_desc(admin_log::Column::Id)
        .one(&backend.audit_db)
        .await
        .expect("Failed to query audit log")
}
