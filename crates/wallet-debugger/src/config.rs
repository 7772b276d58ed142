//! Debugger configuration.
//!
//! Values are layered with [`figment`]: built-in defaults, then `ronin-debug.toml` (or an
//! explicit file), then `RONIN_DEBUG_*` environment variables. Front ends merge their own
//! overrides on top of [`DebuggerConfig::figment`].

use crate::NonceMode;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Page offered when the wallet is not installed.
pub const DEFAULT_INSTALL_URL: &str = "https://wallet.roninchain.com";

/// Statement embedded in sign-in challenges.
pub const DEFAULT_STATEMENT: &str = "I am signing in to debug Ronin Wallet integration";

/// Fallback challenge domain when the environment has no host name.
pub const DEFAULT_DOMAIN: &str = "localhost";

/// Fallback challenge URI when the environment has no origin.
pub const DEFAULT_URI: &str = "http://localhost:3000";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebuggerConfig {
    /// Port of the local bridge server, 0 picks a free one.
    pub port: u16,
    /// Ask the user to open the bridge page on startup.
    pub open_browser: bool,
    pub install_url: String,
    pub statement: String,
    /// Overrides the host name reported by the page.
    pub domain: Option<String>,
    /// Overrides the origin reported by the page.
    pub uri: Option<String>,
    pub nonce: NonceMode,
    /// Seconds to wait for the bridge page to announce the provider.
    pub discovery_timeout: u64,
    /// Seconds to wait for a single wallet request. Unset waits forever.
    pub request_timeout: Option<u64>,
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            open_browser: true,
            install_url: DEFAULT_INSTALL_URL.to_string(),
            statement: DEFAULT_STATEMENT.to_string(),
            domain: None,
            uri: None,
            nonce: NonceMode::Debug,
            discovery_timeout: 300,
            request_timeout: None,
        }
    }
}

/// Failure to extract a [`DebuggerConfig`].
#[derive(Debug, thiserror::Error)]
#[error("failed to extract ronin-debug config: {0}")]
pub struct ExtractConfigError(#[from] figment::Error);

impl DebuggerConfig {
    /// File looked up in the working directory when no explicit file is given.
    pub const FILE_NAME: &'static str = "ronin-debug.toml";

    /// Prefix of the environment variables that override the file.
    pub const ENV_PREFIX: &'static str = "RONIN_DEBUG_";

    /// The layered [`Figment`] the config is extracted from.
    pub fn figment(file: Option<&Path>) -> Figment {
        let file = file.unwrap_or_else(|| Path::new(Self::FILE_NAME));
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(Self::ENV_PREFIX))
    }

    pub fn load(file: Option<&Path>) -> Result<Self, ExtractConfigError> {
        Self::from_figment(Self::figment(file))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ExtractConfigError> {
        let config: Self = figment.extract()?;
        trace!(?config, "loaded config");
        Ok(config)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout.map(Duration::from_secs)
    }
}
