use std::fmt;

/// Defines the source type for a secret
#[derive(Debug, Clone)]
pub enum SecretType {
    /// Load from environment variable
    EnvVar { name: String },
}

/// Configuration for a single secret
pub struct SecretConfig {
    pub secret_type: SecretType,
    pub required: bool,
    /// Minimum length (None = no minimum)
    pub min_length: Option<usize>,
}

impl SecretConfig {
    pub fn new(secret_type: SecretType) -> Self {
        Self {
            secret_type,
            required: true,
            min_length: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }
}

/// Custom error type for secret-related failures
#[derive(Debug)]
pub enum SecretError {
    Missing {
        secret_name: String,
    },
    InvalidLength {
        secret_name: String,
        expected: usize,
        actual: usize,
    },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength {
                secret_name,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Centralized manager for application secrets
///
/// All secrets are read once at startup and never mutated at runtime:
/// `JWT_SECRET` signs session tokens and reset-token hashes,
/// `CREDENTIAL_ENCRYPTION_KEY` keys the at-rest cipher for stored
/// provider API keys, and `PASSWORD_PEPPER` is the keyed secret for
/// password hashing.
pub struct SecretManager {
    jwt_secret: String,
    credential_encryption_key: String,
    password_pepper: String,
}

impl SecretManager {
    /// Initialize the SecretManager by loading and validating all secrets
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or fails validation
    pub fn init() -> Result<Self, SecretError> {
        let jwt_secret = Self::load_secret(&Self::jwt_config())?;
        let credential_encryption_key = Self::load_secret(&Self::encryption_key_config())?;
        let password_pepper = Self::load_secret(&Self::pepper_config())?;

        Ok(Self {
            jwt_secret,
            credential_encryption_key,
            password_pepper,
        })
    }

    fn jwt_config() -> SecretConfig {
        SecretConfig::new(SecretType::EnvVar {
            name: "JWT_SECRET".to_string(),
        })
        .required(true)
        .min_length(32)
    }

    fn encryption_key_config() -> SecretConfig {
        SecretConfig::new(SecretType::EnvVar {
            name: "CREDENTIAL_ENCRYPTION_KEY".to_string(),
        })
        .required(true)
        .min_length(32)
    }

    fn pepper_config() -> SecretConfig {
        SecretConfig::new(SecretType::EnvVar {
            name: "PASSWORD_PEPPER".to_string(),
        })
        .required(true)
        .min_length(16)
    }

    /// Get the JWT signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Get the key material for the credential cipher
    pub fn credential_encryption_key(&self) -> &str {
        &self.credential_encryption_key
    }

    /// Get the pepper for password hashing
    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    /// Load a secret based on its configuration
    pub(crate) fn load_secret(config: &SecretConfig) -> Result<String, SecretError> {
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => match std::env::var(name) {
                Ok(v) => v,
                Err(_) if !config.required => return Ok(String::new()),
                Err(_) => return Err(SecretError::missing(name)),
            },
        };

        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                let name = match &config.secret_type {
                    SecretType::EnvVar { name } => name,
                };
                return Err(SecretError::invalid_length(name, min_len, value.len()));
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("credential_encryption_key", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global; serialize these tests
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    struct EnvGuard {
        vars: Vec<String>,
    }

    impl EnvGuard {
        fn new(vars: Vec<&str>) -> Self {
            for var in &vars {
                unsafe {
                    std::env::remove_var(var);
                }
            }
            Self {
                vars: vars.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                unsafe {
                    std::env::remove_var(var);
                }
            }
        }
    }

    #[test]
    fn test_successful_initialization_with_valid_secrets() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new(vec![
            "JWT_SECRET",
            "CREDENTIAL_ENCRYPTION_KEY",
            "PASSWORD_PEPPER",
        ]);

        unsafe {
            std::env::set_var("JWT_SECRET", "a-jwt-signing-secret-of-32-chars!");
            std::env::set_var(
                "CREDENTIAL_ENCRYPTION_KEY",
                "an-encryption-key-with-32-chars!!",
            );
            std::env::set_var("PASSWORD_PEPPER", "a-pepper-16-chars");
        }

        let manager = SecretManager::init().unwrap();
        assert_eq!(manager.jwt_secret(), "a-jwt-signing-secret-of-32-chars!");
        assert_eq!(
            manager.credential_encryption_key(),
            "an-encryption-key-with-32-chars!!"
        );
    }

    #[test]
    fn test_error_when_jwt_secret_missing() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new(vec![
            "JWT_SECRET",
            "CREDENTIAL_ENCRYPTION_KEY",
            "PASSWORD_PEPPER",
        ]);

        unsafe {
            std::env::set_var(
                "CREDENTIAL_ENCRYPTION_KEY",
                "an-encryption-key-with-32-chars!!",
            );
            std::env::set_var("PASSWORD_PEPPER", "a-pepper-16-chars");
        }

        match SecretManager::init().unwrap_err() {
            SecretError::Missing { secret_name } => assert_eq!(secret_name, "JWT_SECRET"),
            other => panic!("Expected Missing error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_when_encryption_key_too_short() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new(vec![
            "JWT_SECRET",
            "CREDENTIAL_ENCRYPTION_KEY",
            "PASSWORD_PEPPER",
        ]);

        unsafe {
            std::env::set_var("JWT_SECRET", "a-jwt-signing-secret-of-32-chars!");
            std::env::set_var("CREDENTIAL_ENCRYPTION_KEY", "short");
            std::env::set_var("PASSWORD_PEPPER", "a-pepper-16-chars");
        }

        match SecretManager::init().unwrap_err() {
            SecretError::InvalidLength {
                secret_name,
                expected,
                actual,
            } => {
                assert_eq!(secret_name, "CREDENTIAL_ENCRYPTION_KEY");
                assert_eq!(expected, 32);
                assert_eq!(actual, 5);
            }
            other => panic!("Expected InvalidLength error, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_trait_does_not_expose_secrets() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new(vec![
            "JWT_SECRET",
            "CREDENTIAL_ENCRYPTION_KEY",
            "PASSWORD_PEPPER",
        ]);

        unsafe {
            std::env::set_var("JWT_SECRET", "a-jwt-signing-secret-of-32-chars!");
            std::env::set_var(
                "CREDENTIAL_ENCRYPTION_KEY",
                "an-encryption-key-with-32-chars!!",
            );
            std::env::set_var("PASSWORD_PEPPER", "a-pepper-16-chars");
        }

        let manager = SecretManager::init().unwrap();
        let debug_output = format!("{:?}", manager);

        assert!(debug_output.contains("<redacted>"));
        assert!(!debug_output.contains("a-jwt-signing-secret-of-32-chars!"));
        assert!(!debug_output.contains("an-encryption-key-with-32-chars!!"));
    }
}
