use crate::mock::{Harness, MockDiscovery, MockWallet, count, messages};
use alloy_primitives::address;
use ronin_debugger::{
    ConnectionState, ConnectorError, ConnectorErrorKind, DiscoveryError, RoninChain, Severity,
};

#[tokio::test]
async fn discovery_stores_connector() {
    let wallet = MockWallet::new(address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"), 2020);
    let harness = Harness::new(MockDiscovery::found(&wallet));

    harness.debugger.discover_connector().await;

    let session = harness.debugger.session();
    assert!(session.has_connector());
    assert_eq!(session.last_error(), None);
    assert_eq!(harness.debugger.state(), ConnectionState::Ready);

    let entries = harness.debugger.entries();
    assert_eq!(
        messages(&entries),
        [
            "Connector initialized successfully",
            "Requesting Ronin wallet connector",
            "Initializing connector",
        ]
    );
    assert_eq!(entries[0].severity(), Severity::Success);
}

#[tokio::test]
async fn provider_not_found_is_remembered() {
    let harness = Harness::new(MockDiscovery::failing(ConnectorError::provider_not_found().into()));

    harness.debugger.discover_connector().await;

    let session = harness.debugger.session();
    assert!(!session.has_connector());
    assert_eq!(session.last_error(), Some(ConnectorErrorKind::ProviderNotFound));
    assert!(session.wallet_missing());
    assert_eq!(harness.debugger.state(), ConnectionState::Unavailable);

    let entries = harness.debugger.entries();
    assert_eq!(entries[0].message(), "Connector error: ProviderNotFound");
    assert_eq!(entries[0].severity(), Severity::Error);
    assert_eq!(count(&entries, Severity::Error), 1);
}

#[tokio::test]
async fn unrecognized_failure_leaves_no_error_kind() {
    let harness = Harness::new(MockDiscovery::failing(DiscoveryError::Other("boom".into())));

    harness.debugger.discover_connector().await;

    let session = harness.debugger.session();
    assert!(!session.has_connector());
    assert_eq!(session.last_error(), None);
    assert!(!session.wallet_missing());

    let entries = harness.debugger.entries();
    assert_eq!(entries[0].message(), "Unknown error while requesting connector");
    assert_eq!(entries[0].payload().unwrap().render(), "boom");
}

#[tokio::test]
async fn discovery_can_be_retried_until_a_connector_is_held() {
    let wallet = MockWallet::new(address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"), 2020);
    let harness = Harness::new(MockDiscovery::failing(ConnectorError::provider_not_found().into()));

    harness.debugger.discover_connector().await;
    harness.discovery.set_outcome(Ok(wallet));
    harness.debugger.discover_connector().await;

    let session = harness.debugger.session();
    assert!(session.has_connector());
    assert_eq!(session.last_error(), None);

    harness.debugger.discover_connector().await;
    assert_eq!(harness.discovery.calls(), 2);
    assert_eq!(harness.debugger.entries()[0].message(), "Connector already initialized");
}

#[tokio::test]
async fn clear_leaves_one_info_entry() {
    let wallet = MockWallet::new(address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"), 2020);
    let harness = Harness::ready(&wallet).await;
    harness.debugger.connect().await;
    harness.debugger.switch_chain(RoninChain::TESTNET_ID).await;
    assert!(harness.debugger.entries().len() > 5);

    harness.debugger.clear_log();

    let entries = harness.debugger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity(), Severity::Info);
    assert!(harness.debugger.session().is_connected());
}
