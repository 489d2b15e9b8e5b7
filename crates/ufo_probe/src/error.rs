use thiserror::Error;
use tip_client::ClientError;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("tip: {0}")]
    Client(#[from] ClientError),

    #[error("parameter '{parameter}' is read-only")]
    ReadOnly { parameter: String },

    #[error("instrument '{instrument}' has no parameter '{parameter}'")]
    UnknownParameter { instrument: String, parameter: String },

    #[error("unknown instrument '{0}'")]
    UnknownInstrument(String),

    #[error("instrument '{0}' already registered")]
    DuplicateInstrument(String),

    #[error("implausible reading: {raw} K")]
    Implausible { raw: f64 },
}

impl ProbeError {
    /// The remote session could not be established.
    pub fn is_connect(&self) -> bool {
        matches!(self, ProbeError::Client(e) if e.is_connect())
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
