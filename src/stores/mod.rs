// Stores layer - Data access and repository pattern
pub mod audit_store;
pub mod credential_store;
pub mod token_store;
pub mod usage_store;
pub mod user_store;

pub use audit_store::AuditStore;
pub use credential_store::{CredentialStore, DecryptedCredential};
pub use token_store::ResetTokenStore;
pub use usage_store::UsageStore;
pub use user_store::{NewUser, UserStore, UserUpdate};
