use clap::Parser;
use eyre::{Result, WrapErr};
use figment::{
    Figment, Metadata, Profile, Provider,
    error::Kind::InvalidType,
    value::{Dict, Map, Value},
};
use ronin_debugger::{DebuggerConfig, NonceMode};
use serde::Serialize;
use std::path::PathBuf;

/// Debug Ronin Wallet connections and Sign-In with Ethereum from the command line.
///
/// Serves a local bridge page; open it in a browser with the Ronin Wallet extension installed and
/// drive the wallet from the prompt.
#[derive(Clone, Debug, Default, Serialize, Parser)]
#[command(name = "ronin-debug", version, next_display_order = None)]
pub struct RoninDebugArgs {
    /// Port of the local bridge server. 0 picks a free port.
    #[arg(long, short)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Do not ask to open the bridge page on startup.
    #[arg(long)]
    #[serde(skip)]
    pub no_browser: bool,

    /// Config file to use instead of `ronin-debug.toml`.
    #[arg(long, short, value_name = "FILE")]
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Statement embedded in sign-in challenges.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,

    /// How sign-in nonces are generated: `debug` (short integers) or `secure`.
    #[arg(long, value_name = "MODE")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<NonceMode>,

    /// Seconds to wait for the bridge page before giving up on discovery.
    #[arg(long, value_name = "SECS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discovery_timeout: Option<u64>,

    /// Seconds to wait for a single wallet request. Waits forever by default.
    #[arg(long, value_name = "SECS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,

    /// Run these commands in order and exit instead of starting the prompt.
    ///
    /// Example: `--exec connect --exec sign-in --exec status`
    #[arg(long = "exec", short = 'e', value_name = "COMMAND")]
    #[serde(skip)]
    pub exec: Vec<String>,
}

impl RoninDebugArgs {
    /// Config layers with these arguments on top.
    pub fn figment(&self) -> Figment {
        DebuggerConfig::figment(self.config.as_deref()).merge(self)
    }

    pub fn load_config(&self) -> Result<DebuggerConfig> {
        if let Some(path) = &self.config
            && !path.is_file()
        {
            eyre::bail!("config file {} does not exist", path.display());
        }
        DebuggerConfig::from_figment(self.figment()).wrap_err("invalid ronin-debug configuration")
    }
}

// Make the arguments a `figment::Provider` so they can be merged over the file and environment.
impl Provider for RoninDebugArgs {
    fn metadata(&self) -> Metadata {
        Metadata::named("ronin-debug arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let value = Value::serialize(self)?;
        let error = InvalidType(value.to_actual(), "map".into());
        let mut dict = value.into_dict().ok_or(error)?;

        if self.no_browser {
            dict.insert("open_browser".to_string(), false.into());
        }

        Ok(Map::from([(Profile::Default, dict)]))
    }
}
