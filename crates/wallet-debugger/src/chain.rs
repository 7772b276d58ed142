//! Ronin networks known to the debugger.

use alloy_primitives::ChainId;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The two Ronin networks the wallet can be switched between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoninChain {
    Mainnet,
    /// Saigon testnet.
    Testnet,
}

impl RoninChain {
    pub const MAINNET_ID: ChainId = 2020;
    pub const TESTNET_ID: ChainId = 2021;

    pub const fn id(self) -> ChainId {
        match self {
            Self::Mainnet => Self::MAINNET_ID,
            Self::Testnet => Self::TESTNET_ID,
        }
    }

    pub const fn from_id(id: ChainId) -> Option<Self> {
        match id {
            Self::MAINNET_ID => Some(Self::Mainnet),
            Self::TESTNET_ID => Some(Self::Testnet),
            _ => None,
        }
    }

    /// The chain a "switch" without explicit target moves to: testnet when on mainnet, mainnet
    /// otherwise.
    pub fn toggle(active: Option<ChainId>) -> Self {
        if active == Some(Self::MAINNET_ID) { Self::Testnet } else { Self::Mainnet }
    }

    /// Chain id a sign-in challenge is bound to. Anything but the testnet signs for mainnet.
    pub fn sign_in_chain_id(active: Option<ChainId>) -> ChainId {
        if active == Some(Self::TESTNET_ID) { Self::TESTNET_ID } else { Self::MAINNET_ID }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Mainnet => "Ronin Mainnet",
            Self::Testnet => "Saigon Testnet",
        }
    }
}

impl FromStr for RoninChain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "ronin" => Ok(Self::Mainnet),
            "testnet" | "saigon" => Ok(Self::Testnet),
            other => Err(format!("unknown Ronin network `{other}`, expected mainnet or testnet")),
        }
    }
}

/// Display name of an optional chain id, e.g. `Saigon Testnet - 2021`.
pub fn display_chain(chain: Option<ChainId>) -> String {
    let Some(id) = chain else { return "Unknown Chain".to_string() };
    match RoninChain::from_id(id) {
        Some(chain) => format!("{} - {id}", chain.name()),
        None => format!("Unknown Chain - {id}"),
    }
}

/// Parses a chain argument: a Ronin network name, or a decimal or `0x` hex chain id.
pub fn parse_chain(s: &str) -> Result<ChainId, String> {
    if let Ok(chain) = s.parse::<RoninChain>() {
        return Ok(chain.id());
    }
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => ChainId::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| format!("invalid chain `{s}`, expected mainnet, testnet or a chain id"))
}

impl fmt::Display for RoninChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name(), self.id())
    }
}
