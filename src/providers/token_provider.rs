use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use sha2::Sha256;
use uuid::Uuid;

use crate::types::db::user;
use crate::types::internal::auth::{Claims, Role};

type HmacSha256 = Hmac<Sha256>;

/// Session token lifetime
const TOKEN_TTL_HOURS: i64 = 24;

/// Reset token lifetime
const RESET_TOKEN_TTL_HOURS: i64 = 2;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Token is invalid")]
    Invalid,

    #[error("Failed to encode token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// Issues and validates session JWTs and password-reset tokens
pub struct TokenProvider {
    jwt_secret: String,
}

impl TokenProvider {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    /// Issue a session JWT for an authenticated account
    ///
    /// The role is resolved from the directory row at issue time and
    /// embedded in the claims; it is re-read on every request only through
    /// token renewal (login).
    pub fn issue_token(&self, account: &user::Model) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: account.id.clone(),
            email: account.email.clone(),
            role: Role::from_db(&account.role),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + TOKEN_TTL_HOURS * 3600,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Validate a session JWT and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        Ok(token_data.claims)
    }

    /// Session token lifetime in seconds, for response payloads
    pub fn token_ttl_seconds(&self) -> i64 {
        TOKEN_TTL_HOURS * 3600
    }

    /// Generate a random password-reset token (base64, 32 random bytes)
    pub fn generate_reset_token(&self) -> String {
        let mut rng = rand::rng();
        let random_bytes: [u8; 32] = rng.random();
        general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
    }

    /// Hash a reset token with HMAC-SHA256 for storage; the raw token is
    /// never persisted
    pub fn hash_reset_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.jwt_secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(token.as_bytes());
        format!("{:x}", mac.finalize().into_bytes())
    }

    /// Expiry timestamp for a reset token issued now
    pub fn reset_token_expiry(&self) -> i64 {
        Utc::now().timestamp() + RESET_TOKEN_TTL_HOURS * 3600
    }
}
