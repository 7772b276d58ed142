//! Prompt commands and their dispatch onto the [`WalletDebugger`].

use crate::status::{render_entries, render_status};
use alloy_primitives::ChainId;
use ronin_debugger::{RoninChain, WalletDebugger, chain::parse_chain};
use std::{future::Future, str::FromStr, sync::Arc};

/// A command typed at the prompt or passed with `--exec`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DebugCommand {
    /// Look for the wallet again, e.g. after opening or reloading the bridge page.
    Discover,
    /// Connect to the wallet and enumerate its accounts.
    Connect,
    /// Switch networks. Without a target, toggles between mainnet and testnet.
    Switch(Option<ChainId>),
    /// Sign a Sign-In with Ethereum challenge.
    SignIn,
    Disconnect,
    Status,
    /// Print the log, newest first, optionally only the latest `n` entries.
    Logs(Option<usize>),
    Clear,
    Help,
    Quit,
}

impl DebugCommand {
    /// `(usage, description)` of every command, in help order.
    pub const USAGE: &'static [(&'static str, &'static str)] = &[
        ("discover", "Look for Ronin Wallet again after opening or reloading the page"),
        ("connect", "Connect to Ronin Wallet and list its accounts"),
        ("switch [mainnet|testnet|<id>]", "Switch network, toggles when no target is given"),
        ("sign-in", "Sign a Sign-In with Ethereum message"),
        ("disconnect", "Forget the connected account"),
        ("status", "Show the connection state"),
        ("logs [n]", "Print the log, newest first"),
        ("clear", "Clear the log"),
        ("help", "Show this message"),
        ("quit", "Exit"),
    ];

    pub fn help() -> String {
        let width = Self::USAGE.iter().map(|(usage, _)| usage.len()).max().unwrap_or_default();
        let mut out = String::from("Commands:");
        for (usage, description) in Self::USAGE {
            out.push_str(&format!("\n  {usage:<width$}  {description}"));
        }
        out
    }
}

impl FromStr for DebugCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(name) = words.next() else { return Err("no command supplied".to_string()) };
        let arg = words.next();
        if let Some(extra) = words.next() {
            return Err(format!("unexpected argument `{extra}`"));
        }

        let no_arg = |cmd: Self| match arg {
            Some(arg) => Err(format!("`{name}` takes no arguments, got `{arg}`")),
            None => Ok(cmd),
        };

        match name.to_ascii_lowercase().as_str() {
            "discover" | "retry" | "init" => no_arg(Self::Discover),
            "connect" | "c" => no_arg(Self::Connect),
            "switch" | "sw" => arg.map(parse_chain).transpose().map(Self::Switch),
            "sign-in" | "signin" | "siwe" | "s" => no_arg(Self::SignIn),
            "disconnect" | "dc" => no_arg(Self::Disconnect),
            "status" | "st" => no_arg(Self::Status),
            "logs" | "log" | "l" => arg
                .map(|n| n.parse().map_err(|_| format!("invalid entry count `{n}`")))
                .transpose()
                .map(Self::Logs),
            "clear" => no_arg(Self::Clear),
            "help" | "h" | "?" => no_arg(Self::Help),
            "quit" | "exit" | "q" => no_arg(Self::Quit),
            other => Err(format!("unknown command `{other}`, type `help` for a list of commands")),
        }
    }
}

/// Outcome of dispatching a command.
#[derive(Debug, PartialEq, Eq)]
pub enum DispatchResult {
    /// A wallet operation was run or started; its progress is in the log.
    Started,
    /// A local command ran, with optional output to print.
    CommandSuccess(Option<String>),
    /// The input could not be understood.
    CommandFailed(String),
    Quit,
}

impl DispatchResult {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::CommandFailed(_))
    }
}

/// Runs [`DebugCommand`]s against a shared debugger.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    debugger: Arc<WalletDebugger>,
    bridge_url: String,
    /// Spawn wallet operations instead of awaiting them, so the prompt stays responsive.
    background: bool,
}

impl Dispatcher {
    pub fn new(debugger: Arc<WalletDebugger>, bridge_url: impl Into<String>) -> Self {
        Self { debugger, bridge_url: bridge_url.into(), background: false }
    }

    /// Runs wallet operations on spawned tasks. Requires a tokio runtime.
    pub fn in_background(mut self) -> Self {
        self.background = true;
        self
    }

    pub fn debugger(&self) -> &Arc<WalletDebugger> {
        &self.debugger
    }

    /// Parses and dispatches a line of input.
    pub async fn dispatch(&self, input: &str) -> DispatchResult {
        if input.trim().is_empty() {
            return DispatchResult::CommandSuccess(None);
        }
        match input.parse() {
            Ok(cmd) => self.dispatch_command(cmd).await,
            Err(e) => DispatchResult::CommandFailed(e),
        }
    }

    pub async fn dispatch_command(&self, cmd: DebugCommand) -> DispatchResult {
        debug!(?cmd, "dispatching");
        match cmd {
            DebugCommand::Discover => {
                self.run(|d| async move { d.discover_connector().await }).await
            }
            DebugCommand::Connect => self.run(|d| async move { d.connect().await }).await,
            DebugCommand::Switch(target) => {
                let chain_id = target.unwrap_or_else(|| {
                    RoninChain::toggle(self.debugger.session().active_chain()).id()
                });
                self.run(move |d| async move { d.switch_chain(chain_id).await }).await
            }
            DebugCommand::SignIn => self.run(|d| async move { d.sign_in().await }).await,
            DebugCommand::Disconnect => {
                self.debugger.disconnect();
                DispatchResult::Started
            }
            DebugCommand::Status => DispatchResult::CommandSuccess(Some(render_status(
                &self.debugger,
                &self.bridge_url,
            ))),
            DebugCommand::Logs(limit) => DispatchResult::CommandSuccess(Some(render_entries(
                &self.debugger.entries(),
                limit,
            ))),
            DebugCommand::Clear => {
                self.debugger.clear_log();
                DispatchResult::Started
            }
            DebugCommand::Help => DispatchResult::CommandSuccess(Some(DebugCommand::help())),
            DebugCommand::Quit => DispatchResult::Quit,
        }
    }

    async fn run<F, Fut>(&self, op: F) -> DispatchResult
    where
        F: FnOnce(Arc<WalletDebugger>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let fut = op(self.debugger.clone());
        if self.background {
            tokio::spawn(fut);
        } else {
            fut.await;
        }
        DispatchResult::Started
    }
}
