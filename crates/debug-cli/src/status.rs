//! Terminal rendering of the session and its log.

use itertools::Itertools;
use ronin_debugger::{
    ConnectorErrorKind, LogEntry, Severity, WalletDebugger, chain::display_chain,
};
use std::fmt::Write;
use yansi::Paint;

/// Shown while discovery has established that the extension is missing.
pub const WALLET_NOT_FOUND: &str = "Ronin Wallet not found. Please install it first.";

/// Multi-line summary of the connection, as the `status` command prints it.
pub fn render_status(debugger: &WalletDebugger, bridge_url: &str) -> String {
    let session = debugger.session();
    let mut out = String::new();

    let _ = writeln!(out, "{:<11}{}", "State:", debugger.state().bold());
    let _ = writeln!(out, "{:<11}{}", "Bridge:", bridge_url);
    let connector = if session.has_connector() { "available" } else { "not available" };
    let _ = writeln!(out, "{:<11}{connector}", "Connector:");
    let _ = writeln!(out, "{:<11}{}", "Chain:", display_chain(session.active_chain()));

    let account = match session.connected_account() {
        Some(account) => account.to_string().green().to_string(),
        None => "not connected".dim().to_string(),
    };
    let _ = writeln!(out, "{:<11}{account}", "Account:");

    if !session.known_accounts().is_empty() {
        let _ = writeln!(
            out,
            "{:<11}{}",
            "Accounts:",
            session.known_accounts().iter().format(&format!("\n{:<11}", ""))
        );
    }

    if let Some(signature) = session.last_signature() {
        let _ = writeln!(out, "{:<11}{signature}", "Signature:");
    }

    if session.last_error() == Some(ConnectorErrorKind::ProviderNotFound) {
        let _ = writeln!(out, "\n{}", WALLET_NOT_FOUND.red().bold());
        let _ = writeln!(out, "Install from {}", debugger.install_url());
    }

    out.truncate(out.trim_end().len());
    out
}

/// One log entry: `[HH:MM:SS] message`, colored by severity, with the payload indented below.
pub fn render_entry(entry: &LogEntry) -> String {
    let time = entry.timestamp().format("%H:%M:%S").to_string();
    let message = match entry.severity() {
        Severity::Info => entry.message().to_string(),
        Severity::Success => entry.message().green().to_string(),
        Severity::Error => entry.message().red().to_string(),
    };
    let mut out = format!("{} {message}", format!("[{time}]").dim());
    if let Some(payload) = entry.payload() {
        for line in payload.render().lines() {
            let _ = write!(out, "\n    {}", line.dim());
        }
    }
    out
}

/// Entries newest first, at most `limit` of them.
pub fn render_entries(entries: &[LogEntry], limit: Option<usize>) -> String {
    if entries.is_empty() {
        return "Log is empty".dim().to_string();
    }
    let limit = limit.unwrap_or(entries.len());
    entries.iter().take(limit).map(render_entry).join("\n")
}
