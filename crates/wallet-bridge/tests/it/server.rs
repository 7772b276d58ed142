use crate::page::{Page, started, started_with_timeout};
use ronin_bridge::{
    BridgeApiResponse, BridgeCommand, BridgeError, BridgeServer, RpcResponse, SESSION_TOKEN_HEADER,
};
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
async fn start_and_stop() {
    let mut server = BridgeServer::new(0, true, Some(Duration::from_secs(5)));
    assert!(!server.is_running());
    assert!(server.open_browser());
    assert_eq!(server.request_timeout(), Some(Duration::from_secs(5)));

    server.start().await.unwrap();
    assert!(server.is_running());
    assert_ne!(server.port(), 0);
    assert!(matches!(server.start().await, Err(BridgeError::AlreadyRunning)));

    server.stop().await.unwrap();
    assert!(!server.is_running());
    assert!(matches!(server.stop().await, Err(BridgeError::NotRunning)));
}

#[tokio::test]
async fn index_embeds_session_token() {
    let server = started().await;

    let resp = reqwest::get(server.url()).await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains(&format!("const TOKEN = \"{}\";", server.session_token())));
    assert!(!body.contains("__SESSION_TOKEN__"));
}

#[tokio::test]
async fn api_requires_session_token() {
    let server = started().await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/command", server.url());

    let resp = client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);

    let resp = client.get(&url).header(SESSION_TOKEN_HEADER, "nope").send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);

    let resp =
        client.get(&url).header(SESSION_TOKEN_HEADER, server.session_token()).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn empty_command_queue() {
    let server = started().await;
    let page = Page::new(&server);
    assert_eq!(page.next_command().await, None);
}

#[tokio::test]
async fn announcement_is_recorded() {
    let server = started().await;
    let page = Page::new(&server);
    let handle = server.handle();
    assert_eq!(handle.announcement(), None);

    page.announce(true).await;

    let announcement = handle.wait_for_announcement(Duration::from_secs(1)).await.unwrap();
    assert!(announcement.found);
    assert_eq!(announcement.hostname.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn navigation_comes_before_requests() {
    let server = started().await;
    let page = Page::new(&server);
    let handle = server.handle();

    let pending = tokio::spawn({
        let handle = handle.clone();
        async move { handle.request("eth_accounts", json!([])).await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.open("https://wallet.roninchain.com");

    assert_eq!(
        page.wait_command().await,
        BridgeCommand::Open { url: "https://wallet.roninchain.com".into() }
    );
    let request = page.answer("eth_accounts", json!([])).await;
    assert_eq!(request.params, json!([]));
    assert_eq!(pending.await.unwrap().unwrap(), json!([]));
    assert_eq!(handle.pending_requests(), 0);
}

#[tokio::test]
async fn requests_are_dispatched_once() {
    let server = started().await;
    let page = Page::new(&server);
    let handle = server.handle();

    let pending = tokio::spawn({
        let handle = handle.clone();
        async move { handle.request("eth_chainId", json!([])).await }
    });

    let request = page.expect_rpc("eth_chainId").await;
    assert_eq!(page.next_command().await, None);
    assert_eq!(handle.pending_requests(), 1);

    page.respond(&RpcResponse { id: request.id, result: Some(json!("0x7e4")), error: None }).await;
    assert_eq!(pending.await.unwrap().unwrap(), json!("0x7e4"));
}

#[tokio::test]
async fn reloaded_page_receives_unanswered_requests() {
    let server = started().await;
    let old_page = Page::new(&server);
    let handle = server.handle();
    old_page.announce(true).await;

    let pending = tokio::spawn({
        let handle = handle.clone();
        async move { handle.request("eth_requestAccounts", json!([])).await }
    });
    let lost = old_page.expect_rpc("eth_requestAccounts").await;

    // the tab is reloaded before answering
    let new_page = Page::new(&server);
    new_page.announce(true).await;
    let resent = new_page.answer("eth_requestAccounts", json!([])).await;
    assert_eq!(resent.id, lost.id);
    assert_eq!(pending.await.unwrap().unwrap(), json!([]));
    assert_eq!(handle.pending_requests(), 0);
    assert_eq!(new_page.next_command().await, None);
}

#[tokio::test]
async fn unknown_response_id_is_refused() {
    let server = started().await;
    let page = Page::new(&server);

    let api = page
        .respond(&RpcResponse { id: Uuid::new_v4(), result: Some(json!(null)), error: None })
        .await;
    assert_eq!(api, BridgeApiResponse::error("Unknown request id"));
}

#[tokio::test]
async fn malformed_response_is_unprocessable() {
    let server = started().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/response", server.url()))
        .header(SESSION_TOKEN_HEADER, server.session_token())
        .header("Content-Type", "application/json")
        .body(r#"{ "id": "not-a-uuid", "result": "0x1" }"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn provider_errors_are_returned() {
    let server = started().await;
    let page = Page::new(&server);
    let handle = server.handle();

    let pending = tokio::spawn({
        let handle = handle.clone();
        async move { handle.request("eth_requestAccounts", json!([])).await }
    });
    page.reject("eth_requestAccounts", 4001, "User rejected the request.").await;

    match pending.await.unwrap() {
        Err(BridgeError::Rpc { code, message }) => {
            assert_eq!(code, 4001);
            assert_eq!(message, "User rejected the request.");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn request_times_out() {
    let server = started_with_timeout(Some(Duration::from_millis(200))).await;
    let page = Page::new(&server);

    let err = server.handle().request("eth_accounts", json!([])).await.unwrap_err();
    assert!(matches!(err, BridgeError::Timeout { ref method } if method == "eth_accounts"));

    // Retired requests are neither handed out nor answerable.
    assert_eq!(page.next_command().await, None);
    assert_eq!(server.handle().pending_requests(), 0);
}
