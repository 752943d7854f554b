use thiserror::Error;

/// Fallback message used when a transport-level failure carries no
/// message of its own.
pub const TRANSPORT_FALLBACK_MESSAGE: &str = "Transport error, reconnect";

#[derive(Error, Debug)]
pub enum LatticeError {
    #[error("unknown keyspace `{0}`")]
    UnknownKeyspace(String),

    #[error("no servers configured")]
    NoServersConfigured,

    /// Protocol-level failure during connect or call. The connection has
    /// been torn down; the next call to the same node dials fresh.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server processed the request and returned an error response.
    /// The connection stays usable.
    #[error("remote error: {0}")]
    Remote(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("request timeout after {0}ms")]
    Timeout(u64),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LatticeError {
    /// Wraps a transport failure message, substituting the fixed fallback
    /// when the underlying failure is messageless.
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            LatticeError::Transport(TRANSPORT_FALLBACK_MESSAGE.to_string())
        } else {
            LatticeError::Transport(message)
        }
    }
}

pub type Result<T> = std::result::Result<T, LatticeError>;
