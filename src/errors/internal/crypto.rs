use thiserror::Error;

/// Errors from the at-rest credential cipher
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Stored ciphertext could not be decrypted: {0}")]
    Decryption(String),

    #[error("Stored ciphertext is malformed")]
    MalformedCiphertext,
}
