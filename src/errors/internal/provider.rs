use thiserror::Error;

/// Errors from the third-party voice provider API
///
/// Non-success HTTP statuses are preserved so callers can surface the
/// upstream code; nothing here is retried automatically.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider request failed with status {status}")]
    Status { status: u16 },

    #[error("Provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider response could not be decoded: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Upstream HTTP status, when the provider answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }
}
