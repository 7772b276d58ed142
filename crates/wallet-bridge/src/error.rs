use crate::types::RpcError;
use ronin_debugger::{ConnectorError, ConnectorErrorKind};

/// Failures of the bridge server and of requests relayed through it.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("failed to bind bridge server: {0}")]
    Bind(#[source] std::io::Error),
    #[error("bridge server is already running")]
    AlreadyRunning,
    #[error("bridge server is not running")]
    NotRunning,
    #[error("bridge server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("{method} timed out waiting for the bridge page")]
    Timeout { method: String },
    #[error("provider error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("unexpected {method} result: {reason}")]
    UnexpectedResult { method: String, reason: String },
}

impl BridgeError {
    pub(crate) fn unexpected(method: &str, reason: impl std::fmt::Display) -> Self {
        Self::UnexpectedResult { method: method.to_string(), reason: reason.to_string() }
    }
}

impl From<RpcError> for BridgeError {
    fn from(err: RpcError) -> Self {
        Self::Rpc { code: err.code, message: err.message }
    }
}

impl From<BridgeError> for ConnectorError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Rpc { code, message } => {
                Self::new(ConnectorErrorKind::from_eip1193_code(code), message)
            }
            err @ BridgeError::UnexpectedResult { .. } => Self::malformed(err.to_string()),
            err => Self::other(err.to_string()),
        }
    }
}
