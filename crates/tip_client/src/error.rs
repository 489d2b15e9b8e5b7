use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("connect: cannot reach '{address}': {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("connect: '{0}' did not resolve to any address")]
    Resolve(String),

    #[error("timeout: no answer within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("disconnected: remote closed the session")]
    Disconnected,

    #[error("malformed response: {0:?}")]
    Malformed(String),

    #[error("remote: {0}")]
    Remote(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// True when the session was never established.
    pub fn is_connect(&self) -> bool {
        matches!(self, ClientError::Connect { .. } | ClientError::Resolve(_))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
