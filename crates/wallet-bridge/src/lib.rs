//! # ronin-bridge
//!
//! Lets a command-line process reach the Ronin Wallet browser extension.
//!
//! The wallet only lives inside a browser, so the bridge serves a small page on `127.0.0.1`:
//! 1. the page looks for the injected Ronin provider and announces the result;
//! 2. the debugger queues [EIP-1193] requests and navigations;
//! 3. the page polls for them, executes them against the provider and posts the results back.
//!
//! Every `/api` call must carry the per-session token in the `X-Session-Token` header.
//!
//! [EIP-1193]: https://eips.ethereum.org/EIPS/eip-1193

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod app;
mod connector;
mod error;
mod handlers;
mod queue;
mod router;
mod server;
mod state;
mod types;

pub use connector::{
    BridgeConnector, BridgeDiscovery, BridgeEnvironment, BridgeNavigator, BridgeProvider,
};
pub use error::BridgeError;
pub use router::SESSION_TOKEN_HEADER;
pub use server::{BridgeHandle, BridgeServer};
pub use types::{
    BridgeApiResponse, BridgeCommand, ProviderAnnouncement, RpcError, RpcRequest, RpcResponse,
};
