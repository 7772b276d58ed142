use crate::{Connector, ConnectorErrorKind};
use alloy_primitives::{Address, Bytes, ChainId};
use serde::Serialize;
use std::{fmt, sync::Arc};

/// Where the connection state machine currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Uninitialized,
    Discovering,
    /// A connector is available.
    Ready,
    /// Discovery failed; see [`ProviderSession::last_error`].
    Unavailable,
    Connecting,
    Connected,
    /// The last connect attempt produced no connection.
    Failed,
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Discovering => "discovering",
            Self::Ready => "ready",
            Self::Unavailable => "unavailable",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Failed => "failed",
            Self::Disconnected => "disconnected",
        };
        f.write_str(s)
    }
}

/// Everything the debugger knows about the wallet connection.
#[derive(Clone, Debug, Default)]
pub struct ProviderSession {
    pub(crate) connector: Option<Arc<dyn Connector>>,
    pub(crate) connected_account: Option<Address>,
    pub(crate) known_accounts: Vec<Address>,
    pub(crate) active_chain: Option<ChainId>,
    pub(crate) last_error: Option<ConnectorErrorKind>,
    pub(crate) last_signature: Option<Bytes>,
}

impl ProviderSession {
    pub fn connector(&self) -> Option<&Arc<dyn Connector>> {
        self.connector.as_ref()
    }

    pub fn has_connector(&self) -> bool {
        self.connector.is_some()
    }

    pub fn connected_account(&self) -> Option<Address> {
        self.connected_account
    }

    pub fn known_accounts(&self) -> &[Address] {
        &self.known_accounts
    }

    pub fn active_chain(&self) -> Option<ChainId> {
        self.active_chain
    }

    /// Kind of the last classified discovery failure.
    pub fn last_error(&self) -> Option<ConnectorErrorKind> {
        self.last_error
    }

    pub fn last_signature(&self) -> Option<&Bytes> {
        self.last_signature.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.connected_account.is_some()
    }

    /// Whether discovery concluded that the wallet is not installed.
    pub fn wallet_missing(&self) -> bool {
        self.connector.is_none() && self.last_error == Some(ConnectorErrorKind::ProviderNotFound)
    }

    /// Forgets the connection. The connector handle and the discovery error are kept.
    pub(crate) fn reset_connection(&mut self) {
        self.connected_account = None;
        self.known_accounts.clear();
        self.active_chain = None;
        self.last_signature = None;
    }
}
