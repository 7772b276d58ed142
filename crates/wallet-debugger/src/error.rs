use alloy_primitives::hex::FromHexError;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Classification of a failure reported by the wallet connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectorErrorKind {
    /// No injected Ronin provider exists in the page.
    ProviderNotFound,
    /// The user refused the request in the wallet.
    RequestRejected,
    /// The requested account or method has not been authorized by the user.
    Unauthorized,
    /// The provider does not support the requested method.
    UnsupportedMethod,
    /// The provider is not connected to any chain.
    Disconnected,
    /// The wallet does not know the requested chain.
    UnrecognizedChain,
    /// The connector answered with something it was not supposed to.
    MalformedResponse,
    Unknown,
}

impl ConnectorErrorKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ProviderNotFound => "ProviderNotFound",
            Self::RequestRejected => "RequestRejected",
            Self::Unauthorized => "Unauthorized",
            Self::UnsupportedMethod => "UnsupportedMethod",
            Self::Disconnected => "Disconnected",
            Self::UnrecognizedChain => "UnrecognizedChain",
            Self::MalformedResponse => "MalformedResponse",
            Self::Unknown => "Unknown",
        }
    }

    /// Maps an EIP-1193 provider error code.
    pub const fn from_eip1193_code(code: i64) -> Self {
        match code {
            4001 => Self::RequestRejected,
            4100 => Self::Unauthorized,
            4200 => Self::UnsupportedMethod,
            4900 | 4901 => Self::Disconnected,
            4902 => Self::UnrecognizedChain,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ConnectorErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error raised by a [`Connector`](crate::Connector) or [`ProviderHandle`](crate::ProviderHandle).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ConnectorError {
    kind: ConnectorErrorKind,
    message: String,
}

impl ConnectorError {
    pub fn new(kind: ConnectorErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn provider_not_found() -> Self {
        Self::new(ConnectorErrorKind::ProviderNotFound, "Ronin Wallet provider not found")
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ConnectorErrorKind::MalformedResponse, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ConnectorErrorKind::Unknown, message)
    }

    pub fn kind(&self) -> ConnectorErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure to obtain a connector from the wallet-provider library.
#[derive(Clone, Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// A failure the connector library recognized and classified.
    #[error(transparent)]
    Connector(#[from] ConnectorError),
    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl DiscoveryError {
    /// The classified kind, if the failure was recognized.
    pub fn kind(&self) -> Option<ConnectorErrorKind> {
        match self {
            Self::Connector(err) => Some(err.kind()),
            Self::Other(_) => None,
        }
    }
}

/// Reasons a sign-in attempt ends early.
#[derive(Debug, thiserror::Error)]
pub enum HandshakeError {
    #[error("Connector not available")]
    ConnectorUnavailable,
    #[error("No accounts available")]
    NoAccounts,
    #[error("Connector does not have getProvider method")]
    ProviderUnavailable,
    #[error(transparent)]
    Connector(#[from] ConnectorError),
    #[error("wallet returned a signature that is not a hex string: {0}")]
    MalformedSignature(serde_json::Value),
    #[error("wallet returned an invalid hex signature")]
    InvalidSignatureHex(#[from] FromHexError),
}

/// Messages of `error` and its sources, with `outer: inner; inner` collapsed to `outer: inner`.
pub fn dedup_chain(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut causes = Vec::new();
    let mut source = Some(error);
    while let Some(err) = source {
        causes.push(err.to_string().trim().to_string());
        source = err.source();
    }
    causes.dedup_by(|b, a| a.contains(b.as_str()));
    causes
}
