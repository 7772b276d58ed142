//! Capabilities the debugger consumes from the wallet-provider library.
//!
//! The debugger never talks to a wallet directly. It asks a [`ConnectorDiscovery`] for a
//! [`Connector`] once, and drives every wallet interaction through it. Signing goes through the
//! EIP-1193 style [`ProviderHandle`] the connector may expose.

use crate::{ConnectorError, DiscoveryError};
use alloy_primitives::{Address, ChainId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

/// Result of a successful `connect` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResult {
    pub account: Address,
    pub chain_id: ChainId,
}

/// Requests understood by a [`ProviderHandle`].
///
/// Serializes to the EIP-1193 `{ method, params }` request shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum ProviderRequest {
    #[serde(rename = "personal_sign")]
    PersonalSign(String, Address),
}

impl ProviderRequest {
    pub const fn method(&self) -> &'static str {
        match self {
            Self::PersonalSign(..) => "personal_sign",
        }
    }
}

/// Request-capable provider obtained from a [`Connector`].
#[async_trait]
pub trait ProviderHandle: fmt::Debug + Send + Sync {
    /// Submits a request and returns the raw JSON result.
    async fn request(&self, request: ProviderRequest) -> Result<serde_json::Value, ConnectorError>;
}

/// Handle to the injected wallet.
#[async_trait]
pub trait Connector: fmt::Debug + Send + Sync {
    /// Asks the wallet to connect. `Ok(None)` means the wallet answered without a usable result.
    async fn connect(&self) -> Result<Option<ConnectResult>, ConnectorError>;

    /// Accounts already authorized for this page.
    async fn get_accounts(&self) -> Result<Vec<Address>, ConnectorError>;

    /// Accounts, prompting the user for authorization if needed.
    async fn request_accounts(&self) -> Result<Vec<Address>, ConnectorError>;

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), ConnectorError>;

    /// The request-capable provider behind this connector.
    ///
    /// Not every connector exposes one; the default implementation reports the capability as
    /// absent.
    async fn get_provider(&self) -> Result<Option<Arc<dyn ProviderHandle>>, ConnectorError> {
        Ok(None)
    }
}

/// Entry point of the wallet-provider library.
#[async_trait]
pub trait ConnectorDiscovery: fmt::Debug + Send + Sync {
    async fn discover(&self) -> Result<Arc<dyn Connector>, DiscoveryError>;
}

/// Performs the "go install the wallet" navigation.
pub trait Navigator: fmt::Debug + Send + Sync {
    /// Opens `url` for the user. Best effort.
    fn open(&self, url: &str);
}

/// Where the debugger is running, as seen by the sign-in challenge.
pub trait Environment: fmt::Debug + Send + Sync {
    fn hostname(&self) -> Option<String>;

    fn origin(&self) -> Option<String>;
}

/// [`Environment`] with fixed values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticEnvironment {
    pub hostname: Option<String>,
    pub origin: Option<String>,
}

impl Environment for StaticEnvironment {
    fn hostname(&self) -> Option<String> {
        self.hostname.clone()
    }

    fn origin(&self) -> Option<String> {
        self.origin.clone()
    }
}

/// [`Navigator`] that can only tell the user where to go.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn open(&self, url: &str) {
        warn!(%url, "open this page to install Ronin Wallet");
    }
}
