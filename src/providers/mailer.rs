use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}

/// Outbound-mail seam for the password-reset flow
///
/// Reset delivery is the identity layer's only outward side effect, so it
/// sits behind a trait; tests substitute a recording implementation.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a password-reset message carrying the raw (unhashed) token
    async fn send_password_reset(&self, email: &str, token: &str) -> Result<(), MailerError>;
}

/// Default mailer: records the delivery in the application log only.
/// Stands in until a real mail transport is wired up.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, email: &str, _token: &str) -> Result<(), MailerError> {
        tracing::info!("Password reset email queued for {}", email);
        Ok(())
    }
}
