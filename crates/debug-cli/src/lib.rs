//! # ronin-debug
//!
//! Command-line front end of the Ronin Wallet debugger.
//!
//! Starts the local bridge page, discovers the wallet through it and dispatches prompt commands
//! onto a [`WalletDebugger`](ronin_debugger::WalletDebugger).

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod args;
pub mod cmd;
pub mod handler;
pub mod status;
pub mod utils;

mod repl;
pub use repl::{PROMPT, run};
