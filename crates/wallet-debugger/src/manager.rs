//! Connection management: discovery, connect, chain switching and disconnect.

use crate::{
    ConnectionState, ConnectorError, DiscoveryError, Outcome, Payload, WalletDebugger,
    debugger::Operation,
};
use alloy_primitives::{Address, ChainId};

impl WalletDebugger {
    /// Asks the wallet-provider library for a connector.
    ///
    /// Meant to run once at startup. It may be re-run after a failed discovery; while a connector
    /// is held it does nothing.
    pub async fn discover_connector(&self) {
        let Some(_guard) = self.begin(Operation::Discover) else { return };

        if self.session.lock().has_connector() {
            self.log.info("Connector already initialized");
            return;
        }

        self.set_state(ConnectionState::Discovering);
        self.log.info("Initializing connector");
        self.log.info("Requesting Ronin wallet connector");

        match self.discovery.discover().await {
            Ok(connector) => {
                let payload = Payload::text(format!("{connector:?}"));
                {
                    let mut session = self.session.lock();
                    session.connector = Some(connector);
                    session.last_error = None;
                }
                self.set_state(ConnectionState::Ready);
                self.log.success("Connector initialized successfully", Some(payload));
            }
            Err(DiscoveryError::Connector(err)) => {
                self.session.lock().last_error = Some(err.kind());
                self.set_state(ConnectionState::Unavailable);
                self.log.error(format!("Connector error: {}", err.kind()), Some(Payload::error(&err)));
            }
            Err(err) => {
                self.set_state(ConnectionState::Unavailable);
                self.log.error("Unknown error while requesting connector", Some(Payload::error(&err)));
            }
        }
    }

    /// Connects to the wallet and enumerates its accounts.
    ///
    /// When discovery established that the wallet is not installed, this opens the install page
    /// instead and makes no connector call.
    pub async fn connect(&self) {
        let Some(_guard) = self.begin(Operation::Connect) else { return };
        self.log.info("Connecting to Ronin Wallet");

        let (connector, wallet_missing) = {
            let session = self.session.lock();
            (session.connector.clone(), session.wallet_missing())
        };

        if wallet_missing {
            self.log.info("Ronin Wallet not found, redirecting to download page");
            self.navigator.open(&self.install_url);
            return;
        }

        self.set_state(ConnectionState::Connecting);
        self.log.info("Requesting connection to Ronin Wallet");

        let outcome = match &connector {
            Some(connector) => Outcome::from(connector.connect().await),
            None => Outcome::SoftFailure,
        };
        match outcome {
            Outcome::Success(result) => {
                {
                    let mut session = self.session.lock();
                    session.connected_account = Some(result.account);
                    session.active_chain = Some(result.chain_id);
                }
                self.log.success("Connected to Ronin Wallet", Some(Payload::new(result)));
            }
            Outcome::SoftFailure => self.log.error("Connection result was undefined", None),
            Outcome::HardFailure(err) => {
                self.connect_failed(&err);
                return;
            }
        }

        self.log.info("Getting user accounts");
        let accounts: Outcome<Vec<Address>> = match &connector {
            Some(connector) => Outcome::from(connector.get_accounts().await),
            None => Outcome::SoftFailure,
        };
        match accounts {
            Outcome::Success(accounts) => {
                self.session.lock().known_accounts = accounts.clone();
                self.log.success("Retrieved user accounts", Some(Payload::new(accounts)));
            }
            Outcome::SoftFailure => {
                self.log.error("No accounts found or accounts is undefined", None);
            }
            Outcome::HardFailure(err) => {
                self.connect_failed(&err);
                return;
            }
        }

        self.settle_connect_state();
    }

    fn connect_failed(&self, err: &ConnectorError) {
        self.log.error("Error connecting to Ronin Wallet", Some(Payload::error(err)));
        self.settle_connect_state();
    }

    fn settle_connect_state(&self) {
        let connected = self.session.lock().is_connected();
        self.set_state(if connected { ConnectionState::Connected } else { ConnectionState::Failed });
    }

    /// Switches the wallet to `chain_id`. The active chain only changes if the wallet agrees.
    pub async fn switch_chain(&self, chain_id: ChainId) {
        let Some(_guard) = self.begin(Operation::SwitchChain) else { return };
        self.log.info(format!("Switching chain to {chain_id}"));

        let connector = self.session.lock().connector.clone();
        let outcome = match connector {
            Some(connector) => Outcome::from(connector.switch_chain(chain_id).await.map(Some)),
            None => Outcome::HardFailure(ConnectorError::other("Connector not available")),
        };
        match outcome {
            Outcome::Success(()) => {
                self.session.lock().active_chain = Some(chain_id);
                self.log.success(format!("Switched chain to {chain_id}"), None);
            }
            Outcome::SoftFailure => self.log.error("Error switching chain", None),
            Outcome::HardFailure(err) => {
                self.log.error("Error switching chain", Some(Payload::error(&err)));
            }
        }
    }

    /// Forgets the connection locally. The wallet itself is not contacted.
    pub fn disconnect(&self) {
        self.session.lock().reset_connection();
        if matches!(
            self.state(),
            ConnectionState::Connected | ConnectionState::Connecting | ConnectionState::Failed
        ) {
            self.set_state(ConnectionState::Disconnected);
        }
        self.log.info("Wallet disconnected manually");
    }
}
