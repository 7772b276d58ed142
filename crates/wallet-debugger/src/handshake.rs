//! Sign-In with Ronin.

use crate::{
    HandshakeError, Outcome, Payload, ProviderRequest, RoninChain, Severity, SignInChallenge,
    WalletDebugger,
    config::{DEFAULT_DOMAIN, DEFAULT_URI},
    debugger::Operation,
};
use alloy_primitives::{Address, Bytes};
use chrono::Utc;

impl WalletDebugger {
    /// Runs one sign-in handshake.
    ///
    /// Asks the wallet for its accounts, builds a fresh challenge for the first one and requests
    /// a `personal_sign` signature over it. On success the signature is stored in the session.
    /// Every attempt starts from scratch, nothing is kept from a failed one.
    pub async fn sign_in(&self) {
        let Some(_guard) = self.begin(Operation::SignIn) else { return };
        self.log.info("Initiating Sign-In with Ronin");

        match self.handshake().await {
            Ok(signature) => {
                self.session.lock().last_signature = Some(signature.clone());
                self.log.success("Signature received", Some(Payload::new(signature)));
            }
            Err(
                err @ (HandshakeError::ConnectorUnavailable
                | HandshakeError::NoAccounts
                | HandshakeError::ProviderUnavailable),
            ) => self.log.error(err.to_string(), None),
            Err(err) => self.log.error("Error during sign-in", Some(Payload::error(&err))),
        }
    }

    async fn handshake(&self) -> Result<Bytes, HandshakeError> {
        let connector =
            self.session.lock().connector.clone().ok_or(HandshakeError::ConnectorUnavailable)?;

        self.log.info("Requesting accounts");
        let account = match Outcome::from(connector.request_accounts().await) {
            Outcome::Success(accounts) => accounts[0],
            Outcome::SoftFailure => return Err(HandshakeError::NoAccounts),
            Outcome::HardFailure(err) => return Err(err.into()),
        };
        self.log.info(format!("Using account: {account}"));

        let challenge = self.challenge(account);
        self.log.append(Severity::Info, "Created SIWE message", Some(Payload::new(challenge.clone())));

        let message = challenge.to_message();
        self.log.append(Severity::Info, "Message to sign", Some(Payload::text(message.clone())));

        self.log.info("Requesting signature");
        let provider = connector.get_provider().await?.ok_or(HandshakeError::ProviderUnavailable)?;
        let signature = provider.request(ProviderRequest::PersonalSign(message, account)).await?;
        parse_signature(signature)
    }

    /// Builds a challenge for `account`, bound to the active chain and a fresh nonce.
    fn challenge(&self, account: Address) -> SignInChallenge {
        let nonce = self.nonces.generate();
        self.log.info(format!("Generated nonce: {nonce}"));

        let domain = self
            .domain
            .clone()
            .or_else(|| self.environment.hostname())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_DOMAIN.to_string());
        let uri = self
            .uri
            .clone()
            .or_else(|| self.environment.origin())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_URI.to_string());
        let chain_id = RoninChain::sign_in_chain_id(self.session.lock().active_chain);

        SignInChallenge::new(domain, account, uri, chain_id, nonce, self.statement.clone(), Utc::now())
    }
}

fn parse_signature(value: serde_json::Value) -> Result<Bytes, HandshakeError> {
    match value {
        serde_json::Value::String(s) => Ok(s.parse()?),
        other => Err(HandshakeError::MalformedSignature(other)),
    }
}
