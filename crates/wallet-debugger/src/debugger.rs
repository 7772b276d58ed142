use crate::{
    ConnectionState, ConnectorDiscovery, DebuggerConfig, DiagnosticLog, Environment, LogEntry,
    LogNavigator, Navigator, NonceGenerator, NonceMode, ProviderSession, StaticEnvironment,
    config::{DEFAULT_INSTALL_URL, DEFAULT_STATEMENT},
};
use parking_lot::Mutex;
use std::{collections::HashSet, fmt, sync::Arc};

/// Operations that talk to the wallet. At most one of each kind runs at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Discover,
    Connect,
    SwitchChain,
    SignIn,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Discover => "Connector discovery",
            Self::Connect => "Connect",
            Self::SwitchChain => "Chain switch",
            Self::SignIn => "Sign-in",
        })
    }
}

/// A Ronin Wallet debugging session.
///
/// Owns the [`ProviderSession`] and the [`DiagnosticLog`] and exposes the operations that drive
/// them. Operations never fail: every problem ends up as an entry in the log, and the caller
/// observes the effect through [`session`](Self::session) and [`entries`](Self::entries).
///
/// Operations take `&self`, so a session shared behind an [`Arc`] can run several of them
/// concurrently. A second operation of a kind that is already in flight is ignored.
pub struct WalletDebugger {
    pub(crate) discovery: Arc<dyn ConnectorDiscovery>,
    pub(crate) navigator: Arc<dyn Navigator>,
    pub(crate) environment: Arc<dyn Environment>,
    pub(crate) install_url: String,
    pub(crate) statement: Option<String>,
    pub(crate) domain: Option<String>,
    pub(crate) uri: Option<String>,
    pub(crate) nonces: NonceGenerator,
    pub(crate) log: DiagnosticLog,
    pub(crate) session: Mutex<ProviderSession>,
    state: Mutex<ConnectionState>,
    in_flight: Mutex<HashSet<Operation>>,
}

impl fmt::Debug for WalletDebugger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletDebugger")
            .field("state", &self.state())
            .field("session", &*self.session.lock())
            .field("entries", &self.log.len())
            .finish_non_exhaustive()
    }
}

impl WalletDebugger {
    /// Creates an empty session that discovers its connector through `discovery`.
    pub fn new(discovery: Arc<dyn ConnectorDiscovery>) -> Self {
        Self {
            discovery,
            navigator: Arc::new(LogNavigator),
            environment: Arc::new(StaticEnvironment::default()),
            install_url: DEFAULT_INSTALL_URL.to_string(),
            statement: Some(DEFAULT_STATEMENT.to_string()),
            domain: None,
            uri: None,
            nonces: NonceGenerator::new(NonceMode::Debug),
            log: DiagnosticLog::new(),
            session: Mutex::default(),
            state: Mutex::default(),
            in_flight: Mutex::default(),
        }
    }

    /// Creates a session configured from `config`.
    pub fn from_config(discovery: Arc<dyn ConnectorDiscovery>, config: &DebuggerConfig) -> Self {
        let statement = (!config.statement.is_empty()).then(|| config.statement.clone());
        Self::new(discovery)
            .with_install_url(config.install_url.clone())
            .with_statement(statement)
            .with_domain(config.domain.clone())
            .with_uri(config.uri.clone())
            .with_nonce_mode(config.nonce)
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn with_environment(mut self, environment: Arc<dyn Environment>) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_install_url(mut self, url: impl Into<String>) -> Self {
        self.install_url = url.into();
        self
    }

    pub fn with_statement(mut self, statement: Option<String>) -> Self {
        self.statement = statement;
        self
    }

    /// Fixes the challenge domain instead of asking the environment.
    pub fn with_domain(mut self, domain: Option<String>) -> Self {
        self.domain = domain;
        self
    }

    /// Fixes the challenge URI instead of asking the environment.
    pub fn with_uri(mut self, uri: Option<String>) -> Self {
        self.uri = uri;
        self
    }

    pub fn with_nonce_mode(mut self, mode: NonceMode) -> Self {
        self.nonces = NonceGenerator::new(mode);
        self
    }

    /// Snapshot of the provider session.
    pub fn session(&self) -> ProviderSession {
        self.session.lock().clone()
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    /// Log entries, newest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.log.entries()
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    pub fn install_url(&self) -> &str {
        &self.install_url
    }

    pub fn is_in_flight(&self, op: Operation) -> bool {
        self.in_flight.lock().contains(&op)
    }

    /// Discards the log, leaving a single entry that records the clear.
    pub fn clear_log(&self) {
        self.log.clear();
    }

    pub(crate) fn set_state(&self, state: ConnectionState) {
        let previous = std::mem::replace(&mut *self.state.lock(), state);
        if previous != state {
            debug!(%previous, %state, "connection state changed");
        }
    }

    /// Marks `op` as running, or records that it already is and returns `None`.
    pub(crate) fn begin(&self, op: Operation) -> Option<InFlight<'_>> {
        if !self.in_flight.lock().insert(op) {
            self.log.info(format!("{op} already in progress"));
            return None;
        }
        Some(InFlight { set: &self.in_flight, op })
    }
}

/// Releases an [`Operation`] slot when dropped.
pub(crate) struct InFlight<'a> {
    set: &'a Mutex<HashSet<Operation>>,
    op: Operation,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.lock().remove(&self.op);
    }
}
