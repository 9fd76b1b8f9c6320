// Providers layer - crypto, tokens, external collaborators
//
// Providers perform the actual work services orchestrate: encryption,
// token issuance, calls to the voice provider, outbound mail.

pub mod crypto_provider;
pub mod mailer;
pub mod token_provider;
pub mod voice_provider;

pub use crypto_provider::CredentialCipher;
pub use mailer::{LogMailer, Mailer};
pub use token_provider::TokenProvider;
pub use voice_provider::VoiceProviderClient;
