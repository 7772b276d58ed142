use crate::mock::{Harness, MockDiscovery, MockWallet, count, messages, since};
use alloy_primitives::{Address, address, bytes};
use ronin_debugger::{
    ConnectorError, ConnectorErrorKind, NonceMode, ProviderRequest, RoninChain, Severity,
    StaticEnvironment,
};
use std::sync::Arc;

const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
const BOB: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

/// The message passed to the single `personal_sign` request of `wallet`.
fn signed_message(wallet: &MockWallet) -> String {
    let requests = wallet.sign_requests();
    assert_eq!(requests.len(), 1, "expected exactly one signing request");
    let ProviderRequest::PersonalSign(message, _) = &requests[0];
    message.clone()
}

fn line<'a>(message: &'a str, prefix: &str) -> &'a str {
    message
        .lines()
        .find_map(|l| l.strip_prefix(prefix))
        .unwrap_or_else(|| panic!("no `{prefix}` line in:\n{message}"))
}

#[tokio::test]
async fn sign_in_stores_signature() {
    let wallet = MockWallet::new(ALICE, RoninChain::MAINNET_ID);
    let harness = Harness::ready(&wallet).await;
    let before = harness.debugger.entries().len();

    harness.debugger.sign_in().await;

    assert_eq!(harness.debugger.session().last_signature(), Some(&bytes!("deadbeef")));
    let entries = harness.debugger.entries();
    let new = since(&entries, before);
    assert_eq!(new[0].message(), "Signature received");
    assert_eq!(new[0].severity(), Severity::Success);
    assert_eq!(count(new, Severity::Error), 0);
    assert_eq!(new.last().unwrap().message(), "Initiating Sign-In with Ronin");

    let requests = wallet.sign_requests();
    let ProviderRequest::PersonalSign(message, account) = &requests[0];
    assert_eq!(*account, ALICE);
    assert!(message.starts_with(
        "localhost wants you to sign in with your Ethereum account:\n\
         0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266\n\n\
         I am signing in to debug Ronin Wallet integration\n\n\
         URI: http://localhost:3000\nVersion: 1\nChain ID: 2020\n"
    ));
}

#[tokio::test]
async fn no_accounts_logs_one_error() {
    let wallet = MockWallet::new(ALICE, RoninChain::MAINNET_ID);
    wallet.set_requested_accounts(Ok(vec![]));
    let harness = Harness::ready(&wallet).await;
    let before = harness.debugger.entries().len();

    harness.debugger.sign_in().await;

    let entries = harness.debugger.entries();
    let new = since(&entries, before);
    assert_eq!(count(new, Severity::Error), 1);
    assert_eq!(new[0].message(), "No accounts available");
    assert!(new[0].payload().is_none());
    assert!(wallet.sign_requests().is_empty());
    assert!(!wallet.calls().contains(&"get_provider"));
    assert_eq!(harness.debugger.session().last_signature(), None);
}

#[tokio::test]
async fn sign_in_without_connector() {
    let harness = Harness::new(MockDiscovery::failing(ConnectorError::provider_not_found().into()));
    harness.debugger.discover_connector().await;
    let before = harness.debugger.entries().len();

    harness.debugger.sign_in().await;

    let entries = harness.debugger.entries();
    assert_eq!(
        messages(since(&entries, before)),
        ["Connector not available", "Initiating Sign-In with Ronin"]
    );
}

#[tokio::test]
async fn connector_without_provider() {
    let wallet = MockWallet::new(ALICE, RoninChain::MAINNET_ID);
    wallet.without_provider();
    let harness = Harness::ready(&wallet).await;

    harness.debugger.sign_in().await;

    let entries = harness.debugger.entries();
    assert_eq!(entries[0].message(), "Connector does not have getProvider method");
    assert_eq!(entries[0].severity(), Severity::Error);
    assert_eq!(entries[1].message(), "Requesting signature");
    assert!(wallet.sign_requests().is_empty());
}

#[tokio::test]
async fn rejected_signature() {
    let wallet = MockWallet::new(ALICE, RoninChain::MAINNET_ID);
    wallet.set_signature(Err(ConnectorError::new(
        ConnectorErrorKind::RequestRejected,
        "User rejected the request",
    )));
    let harness = Harness::ready(&wallet).await;

    harness.debugger.sign_in().await;

    let entries = harness.debugger.entries();
    assert_eq!(entries[0].message(), "Error during sign-in");
    assert_eq!(entries[0].payload().unwrap().render(), "RequestRejected: User rejected the request");
    assert_eq!(harness.debugger.session().last_signature(), None);
}

#[tokio::test]
async fn non_string_signature_is_an_error() {
    let wallet = MockWallet::new(ALICE, RoninChain::MAINNET_ID);
    wallet.set_signature(Ok(serde_json::json!({ "r": "0x1" })));
    let harness = Harness::ready(&wallet).await;

    harness.debugger.sign_in().await;

    let entries = harness.debugger.entries();
    assert_eq!(entries[0].message(), "Error during sign-in");
    assert_eq!(harness.debugger.session().last_signature(), None);
}

#[tokio::test]
async fn requests_accounts_even_after_connect() {
    let wallet = MockWallet::new(ALICE, RoninChain::MAINNET_ID);
    wallet.set_requested_accounts(Ok(vec![BOB, ALICE]));
    let harness = Harness::ready(&wallet).await;
    harness.debugger.connect().await;

    harness.debugger.sign_in().await;

    assert_eq!(
        wallet.calls(),
        ["connect", "get_accounts", "request_accounts", "get_provider", "request"]
    );
    let ProviderRequest::PersonalSign(_, account) = wallet.sign_requests()[0].clone();
    assert_eq!(account, BOB);
    let entries = harness.debugger.entries();
    assert!(entries.iter().any(|e| e.message() == format!("Using account: {BOB}")));
}

#[tokio::test]
async fn challenge_binds_testnet_chain() {
    let wallet = MockWallet::new(ALICE, RoninChain::TESTNET_ID);
    let harness = Harness::ready(&wallet).await;
    harness.debugger.connect().await;

    harness.debugger.sign_in().await;

    assert_eq!(line(&signed_message(&wallet), "Chain ID: "), "2021");
}

#[tokio::test]
async fn unknown_chain_signs_for_mainnet() {
    let wallet = MockWallet::new(ALICE, 1);
    let harness = Harness::ready(&wallet).await;
    harness.debugger.connect().await;

    harness.debugger.sign_in().await;

    assert_eq!(line(&signed_message(&wallet), "Chain ID: "), "2020");
}

#[tokio::test]
async fn challenge_uses_environment() {
    let wallet = MockWallet::new(ALICE, RoninChain::MAINNET_ID);
    let environment = StaticEnvironment {
        hostname: Some("app.roninchain.com".into()),
        origin: Some("https://app.roninchain.com".into()),
    };
    let harness = Harness::build(MockDiscovery::found(&wallet), |debugger| {
        debugger.with_environment(Arc::new(environment)).with_statement(None)
    });
    harness.debugger.discover_connector().await;

    harness.debugger.sign_in().await;

    let message = signed_message(&wallet);
    assert!(message.starts_with("app.roninchain.com wants you to sign in"));
    assert!(message.contains(
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266\n\n\nURI: https://app.roninchain.com\n"
    ));
}

#[tokio::test]
async fn configured_domain_overrides_environment() {
    let wallet = MockWallet::new(ALICE, RoninChain::MAINNET_ID);
    let environment = StaticEnvironment { hostname: Some("page.local".into()), origin: None };
    let harness = Harness::build(MockDiscovery::found(&wallet), |debugger| {
        debugger
            .with_environment(Arc::new(environment))
            .with_domain(Some("debug.ronin".into()))
            .with_uri(Some("https://debug.ronin/login".into()))
    });
    harness.debugger.discover_connector().await;

    harness.debugger.sign_in().await;

    let message = signed_message(&wallet);
    assert!(message.starts_with("debug.ronin wants you to sign in"));
    assert_eq!(line(&message, "URI: "), "https://debug.ronin/login");
}

#[tokio::test]
async fn challenge_expires_one_day_after_issue() {
    let wallet = MockWallet::new(ALICE, RoninChain::MAINNET_ID);
    let harness = Harness::ready(&wallet).await;

    harness.debugger.sign_in().await;

    let message = signed_message(&wallet);
    let issued: chrono::DateTime<chrono::Utc> = line(&message, "Issued At: ").parse().unwrap();
    let expires: chrono::DateTime<chrono::Utc> =
        line(&message, "Expiration Time: ").parse().unwrap();
    assert_eq!(expires - issued, chrono::TimeDelta::days(1));
    assert!(line(&message, "Issued At: ").ends_with('Z'));
}

#[tokio::test]
async fn logged_nonce_matches_message() {
    let wallet = MockWallet::new(ALICE, RoninChain::MAINNET_ID);
    let harness = Harness::ready(&wallet).await;

    harness.debugger.sign_in().await;

    let nonce = line(&signed_message(&wallet), "Nonce: ").to_string();
    assert!(nonce.parse::<u32>().unwrap() < 1_000_000);
    let entries = harness.debugger.entries();
    assert!(entries.iter().any(|e| e.message() == format!("Generated nonce: {nonce}")));

    let logged = entries.iter().find(|e| e.message() == "Message to sign").unwrap();
    assert_eq!(logged.payload().unwrap().render(), signed_message(&wallet));

    let challenge = entries.iter().find(|e| e.message() == "Created SIWE message").unwrap();
    let json = challenge.payload().unwrap().to_json().unwrap();
    assert_eq!(json["nonce"], nonce.as_str());
    assert_eq!(json["chainId"], 2020);
}

#[tokio::test]
async fn each_attempt_draws_a_new_nonce() {
    let wallet = MockWallet::new(ALICE, RoninChain::MAINNET_ID);
    let harness = Harness::build(MockDiscovery::found(&wallet), |debugger| {
        debugger.with_nonce_mode(NonceMode::Secure)
    });
    harness.debugger.discover_connector().await;

    harness.debugger.sign_in().await;
    harness.debugger.sign_in().await;

    let nonces: Vec<String> = wallet
        .sign_requests()
        .iter()
        .map(|ProviderRequest::PersonalSign(message, _)| line(message, "Nonce: ").to_string())
        .collect();
    assert_eq!(nonces.len(), 2);
    assert_ne!(nonces[0], nonces[1]);
    assert!(nonces.iter().all(|n| n.len() == 17 && n.chars().all(|c| c.is_ascii_alphanumeric())));
}
