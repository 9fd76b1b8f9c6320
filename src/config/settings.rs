use std::env;

/// Application settings loaded from environment variables
///
/// Secrets are handled separately by the SecretManager; everything here is
/// safe to log.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Server host (default: 0.0.0.0)
    pub host: String,
    /// Server port (default: 3000)
    pub port: u16,
    /// Primary database URL
    pub database_url: String,
    /// Audit database URL
    pub audit_database_url: String,
    /// Base URL of the third-party voice provider
    pub provider_base_url: String,
    /// Linear transform constant: provider characters per minute of audio
    pub chars_per_minute: f64,
    /// First-admin bootstrap credentials, both optional
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self, SettingsError> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| SettingsError::InvalidValue("PORT"))?;

        let chars_per_minute: f64 = env::var("CHARS_PER_MINUTE")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .map_err(|_| SettingsError::InvalidValue("CHARS_PER_MINUTE"))?;
        if chars_per_minute <= 0.0 {
            return Err(SettingsError::InvalidValue("CHARS_PER_MINUTE"));
        }

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://voicedash.db?mode=rwc".to_string()),
            audit_database_url: env::var("AUDIT_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://voicedash-audit.db?mode=rwc".to_string()),
            provider_base_url: env::var("PROVIDER_BASE_URL")
                .unwrap_or_else(|_| "https://api.elevenlabs.io".to_string()),
            chars_per_minute,
            bootstrap_admin_email: env::var("BOOTSTRAP_ADMIN_EMAIL").ok(),
            bootstrap_admin_password: env::var("BOOTSTRAP_ADMIN_PASSWORD").ok(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Invalid value for environment variable {0}")]
    InvalidValue(&'static str),
}
