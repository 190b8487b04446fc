use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(String),
    #[error("Storage contents are not valid JSON: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Failure reported by the feature flag endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Error {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl FlagError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FlagError::Decode(err.to_string())
        } else {
            FlagError::Transport(err.to_string())
        }
    }
}

/// Failure reported by the session token guard.
///
/// Cloneable so a single in-flight refresh can hand the same outcome to
/// every caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("No token")]
    NoToken,
    #[error("No valid authentication token available: {0}")]
    NoValidToken(#[source] Box<AuthError>),
    #[error("Token refresh failed: {status}")]
    RefreshRejected { status: u16 },
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AuthError::Timeout
        } else if err.is_decode() {
            AuthError::Decode(err.to_string())
        } else {
            AuthError::Transport(err.to_string())
        }
    }
}
