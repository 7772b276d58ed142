//! The debugger driven end to end through the bridge.

use crate::page::{Page, started};
use alloy_primitives::{Address, address, bytes};
use ronin_bridge::{BridgeCommand, BridgeDiscovery, BridgeEnvironment, BridgeNavigator};
use ronin_debugger::{ConnectionState, ConnectorErrorKind, Severity, WalletDebugger};
use serde_json::json;
use std::{sync::Arc, time::Duration};

const ALICE: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

fn debugger(server: &ronin_bridge::BridgeServer) -> Arc<WalletDebugger> {
    let handle = server.handle();
    Arc::new(
        WalletDebugger::new(Arc::new(BridgeDiscovery::new(handle.clone(), Duration::from_secs(5))))
            .with_navigator(Arc::new(BridgeNavigator::new(handle.clone())))
            .with_environment(Arc::new(BridgeEnvironment::new(handle))),
    )
}

#[tokio::test]
async fn connect_and_sign_in() {
    let server = started().await;
    let page = Page::new(&server);
    let debugger = debugger(&server);

    page.announce(true).await;
    debugger.discover_connector().await;
    assert_eq!(debugger.state(), ConnectionState::Ready);

    let task = tokio::spawn({
        let debugger = debugger.clone();
        async move { debugger.connect().await }
    });
    page.answer("eth_requestAccounts", json!([ALICE])).await;
    page.answer("eth_chainId", json!("0x7e5")).await;
    page.answer("eth_accounts", json!([ALICE])).await;
    task.await.unwrap();

    let session = debugger.session();
    assert_eq!(session.connected_account(), Some(ALICE));
    assert_eq!(session.active_chain(), Some(2021));
    assert_eq!(debugger.state(), ConnectionState::Connected);

    let task = tokio::spawn({
        let debugger = debugger.clone();
        async move { debugger.sign_in().await }
    });
    page.answer("eth_requestAccounts", json!([ALICE])).await;
    let request = page.answer("personal_sign", json!("0x5167")).await;
    task.await.unwrap();

    let message = request.params[0].as_str().unwrap();
    assert!(message.starts_with("127.0.0.1 wants you to sign in with your Ethereum account:\n"));
    assert!(message.contains("\nURI: http://127.0.0.1:3000\n"));
    assert!(message.contains("\nChain ID: 2021\n"));
    assert_eq!(request.params[1], json!(ALICE));
    assert_eq!(debugger.session().last_signature(), Some(&bytes!("5167")));
    assert_eq!(debugger.entries().iter().filter(|e| e.severity() == Severity::Error).count(), 0);
}

#[tokio::test]
async fn missing_wallet_opens_install_page() {
    let server = started().await;
    let page = Page::new(&server);
    let debugger = debugger(&server);

    page.announce(false).await;
    debugger.discover_connector().await;
    assert_eq!(debugger.session().last_error(), Some(ConnectorErrorKind::ProviderNotFound));

    debugger.connect().await;

    assert_eq!(
        page.next_command().await,
        Some(BridgeCommand::Open { url: "https://wallet.roninchain.com".into() })
    );
    assert_eq!(page.next_command().await, None);
}

#[tokio::test]
async fn connect_survives_page_reload() {
    let server = started().await;
    let page = Page::new(&server);
    let debugger = debugger(&server);

    page.announce(true).await;
    debugger.discover_connector().await;

    let task = tokio::spawn({
        let debugger = debugger.clone();
        async move { debugger.connect().await }
    });
    page.expect_rpc("eth_requestAccounts").await;

    let reloaded = Page::new(&server);
    reloaded.announce(true).await;
    reloaded.answer("eth_requestAccounts", json!([ALICE])).await;
    reloaded.answer("eth_chainId", json!("0x7e4")).await;
    reloaded.answer("eth_accounts", json!([ALICE])).await;
    task.await.unwrap();

    assert_eq!(debugger.state(), ConnectionState::Connected);
    assert!(!debugger.is_in_flight(ronin_debugger::Operation::Connect));
    assert_eq!(debugger.session().connected_account(), Some(ALICE));
}
