use thiserror::Error;

/// Authentication failures.
///
/// Surfaced to the user as an inline message and never retried
/// automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("username already exists")]
    DuplicateUsername,

    #[error("registration rejected: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Non-2xx response from the remote service. The message comes from the
    /// JSON `message`/`error` field when present, else the raw body, else
    /// `"HTTP <status>"`.
    #[error("HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    /// Rejected before any network round-trip.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request never produced a response (connection failure, TLS, ...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// A 2xx response whose body could not be decoded as expected.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<bridge_traits::BridgeError> for ClientError {
    fn from(err: bridge_traits::BridgeError) -> Self {
        ClientError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
