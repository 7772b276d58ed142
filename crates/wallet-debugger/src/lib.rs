//! # ronin-debugger
//!
//! Connection and authentication state machine for debugging Ronin Wallet integrations.
//!
//! A [`WalletDebugger`] discovers a wallet [`Connector`], connects to it, switches between the
//! Ronin networks and performs a Sign-In with Ethereum ([ERC-4361]) handshake. Every step is
//! recorded in a [`DiagnosticLog`]; no operation ever returns an error to its caller.
//!
//! The wallet itself is reached through the traits in [`connector`], which are implemented by
//! the host: a browser bridge for the command line, or test doubles.
//!
//! [ERC-4361]: https://eips.ethereum.org/EIPS/eip-4361

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod chain;
pub mod config;
pub mod connector;
pub mod log;
pub mod siwe;

mod debugger;
mod error;
mod handshake;
mod manager;
mod nonce;
mod outcome;
mod session;

pub use chain::RoninChain;
pub use config::{DebuggerConfig, ExtractConfigError};
pub use connector::{
    ConnectResult, Connector, ConnectorDiscovery, Environment, LogNavigator, Navigator,
    ProviderHandle, ProviderRequest, StaticEnvironment,
};
pub use debugger::{Operation, WalletDebugger};
pub use error::{ConnectorError, ConnectorErrorKind, DiscoveryError, HandshakeError, dedup_chain};
pub use log::{DiagnosticLog, LogEntry, Payload, Severity};
pub use nonce::{NonceGenerator, NonceMode};
pub use outcome::Outcome;
pub use session::{ConnectionState, ProviderSession};
pub use siwe::SignInChallenge;
