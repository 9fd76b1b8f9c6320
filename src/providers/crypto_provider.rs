use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, KeyInit, Nonce};
use base64::{engine::general_purpose, Engine as _};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::errors::internal::CryptoError;

/// AES-256-GCM nonce length in bytes
const NONCE_LEN: usize = 12;

/// Symmetric cipher protecting stored provider API keys at rest
///
/// One process-wide instance keyed from configuration at startup. This is
/// confidentiality against casual inspection of the document store only;
/// anyone holding the configured key can decrypt every stored credential.
pub struct CredentialCipher {
    key: [u8; 32],
}

impl CredentialCipher {
    /// Derive the cipher key from the configured secret via SHA-256
    pub fn new(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Encrypt a plaintext key, returning base64(nonce || ciphertext)
    ///
    /// A fresh random nonce is drawn per call, so encrypting the same
    /// plaintext twice yields different ciphertexts.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;

        let mut framed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        framed.extend_from_slice(nonce.as_slice());
        framed.extend_from_slice(&ciphertext);

        Ok(general_purpose::STANDARD.encode(framed))
    }

    /// Decrypt a stored base64(nonce || ciphertext) value
    ///
    /// # Errors
    /// * `CryptoError::MalformedCiphertext` - not valid base64, or too short
    ///   to contain a nonce
    /// * `CryptoError::Decryption` - authentication failed (tampered or
    ///   encrypted under a different key) or the plaintext is not UTF-8
    pub fn decrypt(&self, encoded: &str) -> Result<String, CryptoError> {
        let framed = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|_| CryptoError::MalformedCiphertext)?;

        if framed.len() <= NONCE_LEN {
            return Err(CryptoError::MalformedCiphertext);
        }
        let (nonce_bytes, ciphertext) = framed.split_at(NONCE_LEN);

        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| CryptoError::Decryption(e.to_string()))?;
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoError::Decryption("ciphertext failed authentication".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::Decryption("plaintext is not valid UTF-8".to_string()))
    }
}

impl fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCipher")
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Generate a cryptographically secure one-time password
///
/// Used as the throwaway initial password for admin-provisioned accounts;
/// the account holder is expected to go through the reset-email flow
/// before first login.
pub fn generate_one_time_password() -> String {
    const PASSWORD_LENGTH: usize = 20;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                             abcdefghijklmnopqrstuvwxyz\
                             0123456789\
                             !@#$%^&*()_+-=[]{}|;:,.<>?";

    let mut rng = rand::rng();
    (0..PASSWORD_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Masked display form of a stored key: all but the last four characters
/// replaced
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
