//! The debugger's wallet capabilities, implemented on top of the bridge page.

use crate::{error::BridgeError, server::BridgeHandle};
use alloy_primitives::{Address, ChainId};
use async_trait::async_trait;
use ronin_debugger::{
    ConnectResult, Connector, ConnectorDiscovery, ConnectorError, DiscoveryError, Environment,
    Navigator, ProviderHandle, ProviderRequest,
};
use serde_json::{Value, json};
use std::{sync::Arc, time::Duration};

/// Finds the Ronin provider by waiting for the bridge page to announce itself.
#[derive(Clone, Debug)]
pub struct BridgeDiscovery {
    handle: BridgeHandle,
    wait: Duration,
}

impl BridgeDiscovery {
    pub fn new(handle: BridgeHandle, wait: Duration) -> Self {
        Self { handle, wait }
    }
}

#[async_trait]
impl ConnectorDiscovery for BridgeDiscovery {
    async fn discover(&self) -> Result<Arc<dyn Connector>, DiscoveryError> {
        let Some(announcement) = self.handle.wait_for_announcement(self.wait).await else {
            return Err(DiscoveryError::Other(format!(
                "bridge page did not load within {}s",
                self.wait.as_secs()
            )));
        };
        if !announcement.found {
            return Err(ConnectorError::provider_not_found().into());
        }
        Ok(Arc::new(BridgeConnector::new(self.handle.clone())))
    }
}

/// [`Connector`] that relays every call to the page's injected provider.
#[derive(Clone, Debug)]
pub struct BridgeConnector {
    handle: BridgeHandle,
}

impl BridgeConnector {
    pub fn new(handle: BridgeHandle) -> Self {
        Self { handle }
    }

    async fn accounts(&self, method: &str) -> Result<Vec<Address>, BridgeError> {
        let value = self.handle.request(method, json!([])).await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(value).map_err(|err| BridgeError::unexpected(method, err))
    }

    async fn chain_id(&self) -> Result<ChainId, BridgeError> {
        let value = self.handle.request("eth_chainId", json!([])).await?;
        parse_chain_id(&value).ok_or_else(|| BridgeError::unexpected("eth_chainId", value))
    }
}

#[async_trait]
impl Connector for BridgeConnector {
    async fn connect(&self) -> Result<Option<ConnectResult>, ConnectorError> {
        let Some(account) = self.accounts("eth_requestAccounts").await?.first().copied() else {
            return Ok(None);
        };
        let chain_id = self.chain_id().await?;
        Ok(Some(ConnectResult { account, chain_id }))
    }

    async fn get_accounts(&self) -> Result<Vec<Address>, ConnectorError> {
        Ok(self.accounts("eth_accounts").await?)
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ConnectorError> {
        Ok(self.accounts("eth_requestAccounts").await?)
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), ConnectorError> {
        let params = json!([{ "chainId": format!("{chain_id:#x}") }]);
        self.handle.request("wallet_switchEthereumChain", params).await?;
        Ok(())
    }

    async fn get_provider(&self) -> Result<Option<Arc<dyn ProviderHandle>>, ConnectorError> {
        Ok(Some(Arc::new(BridgeProvider { handle: self.handle.clone() })))
    }
}

/// The page's EIP-1193 provider.
#[derive(Clone, Debug)]
pub struct BridgeProvider {
    handle: BridgeHandle,
}

#[async_trait]
impl ProviderHandle for BridgeProvider {
    async fn request(&self, request: ProviderRequest) -> Result<Value, ConnectorError> {
        let method = request.method();
        let mut value = serde_json::to_value(&request)
            .map_err(|err| ConnectorError::other(format!("failed to encode {method}: {err}")))?;
        let params = value.get_mut("params").map(Value::take).unwrap_or(Value::Null);
        Ok(self.handle.request(method, params).await?)
    }
}

/// Opens pages in a new tab next to the bridge page.
#[derive(Clone, Debug)]
pub struct BridgeNavigator {
    handle: BridgeHandle,
}

impl BridgeNavigator {
    pub fn new(handle: BridgeHandle) -> Self {
        Self { handle }
    }
}

impl Navigator for BridgeNavigator {
    fn open(&self, url: &str) {
        debug!(url, "asking bridge page to navigate");
        self.handle.open(url);
    }
}

/// Host name and origin of the bridge page, as it announced them.
#[derive(Clone, Debug)]
pub struct BridgeEnvironment {
    handle: BridgeHandle,
}

impl BridgeEnvironment {
    pub fn new(handle: BridgeHandle) -> Self {
        Self { handle }
    }
}

impl Environment for BridgeEnvironment {
    fn hostname(&self) -> Option<String> {
        self.handle.announcement()?.hostname
    }

    fn origin(&self) -> Option<String> {
        self.handle.announcement()?.origin
    }
}

/// `eth_chainId` answers with a hex quantity; some wallets send a plain number.
fn parse_chain_id(value: &Value) -> Option<ChainId> {
    match value {
        Value::String(s) => match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => ChainId::from_str_radix(hex, 16).ok(),
            None => s.parse().ok(),
        },
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}
