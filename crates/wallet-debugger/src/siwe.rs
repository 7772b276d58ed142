//! Sign-In with Ethereum ([ERC-4361](https://eips.ethereum.org/EIPS/eip-4361)) challenges.

use alloy_primitives::{Address, ChainId};
use chrono::{DateTime, Days, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt::Write;

/// Version of the message format, always `1`.
pub const SIWE_VERSION: &str = "1";

/// A sign-in challenge bound to one account, domain and nonce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInChallenge {
    pub domain: String,
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,
    pub uri: String,
    pub version: String,
    pub chain_id: ChainId,
    pub nonce: String,
    pub issued_at: DateTime<Utc>,
    pub expiration_time: DateTime<Utc>,
}

impl SignInChallenge {
    /// Builds a challenge issued at `issued_at` that expires exactly one calendar day later.
    pub fn new(
        domain: impl Into<String>,
        address: Address,
        uri: impl Into<String>,
        chain_id: ChainId,
        nonce: impl Into<String>,
        statement: Option<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let expiration_time = issued_at + Days::new(1);
        Self {
            domain: domain.into(),
            address,
            statement,
            uri: uri.into(),
            version: SIWE_VERSION.to_string(),
            chain_id,
            nonce: nonce.into(),
            issued_at,
            expiration_time,
        }
    }

    /// Canonical ERC-4361 text, the exact bytes the wallet is asked to sign.
    pub fn to_message(&self) -> String {
        let mut msg = String::with_capacity(512);
        let _ = writeln!(msg, "{} wants you to sign in with your Ethereum account:", self.domain);
        let _ = writeln!(msg, "{}", self.address.to_checksum(None));
        msg.push('\n');
        if let Some(statement) = &self.statement {
            let _ = writeln!(msg, "{statement}");
        }
        msg.push('\n');
        let _ = writeln!(msg, "URI: {}", self.uri);
        let _ = writeln!(msg, "Version: {}", self.version);
        let _ = writeln!(msg, "Chain ID: {}", self.chain_id);
        let _ = writeln!(msg, "Nonce: {}", self.nonce);
        let _ = writeln!(msg, "Issued At: {}", format_timestamp(&self.issued_at));
        let _ = write!(msg, "Expiration Time: {}", format_timestamp(&self.expiration_time));
        msg
    }
}

/// RFC 3339 with millisecond precision and a `Z` suffix, e.g. `2024-05-01T12:00:00.000Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
