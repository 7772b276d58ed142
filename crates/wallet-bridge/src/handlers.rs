use crate::{
    app::contents,
    state::BridgeState,
    types::{BridgeApiResponse, BridgeCommand, ProviderAnnouncement, RpcResponse},
};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::{Html, IntoResponse},
};
use std::sync::Arc;

pub(crate) async fn serve_index(State(state): State<Arc<BridgeState>>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    let page = contents::INDEX_HTML.replace(contents::TOKEN_PLACEHOLDER, state.session_token());
    (headers, Html(page))
}

pub(crate) async fn post_provider(
    State(state): State<Arc<BridgeState>>,
    Json(announcement): Json<ProviderAnnouncement>,
) -> Json<BridgeApiResponse<()>> {
    debug!(?announcement, "bridge page announced provider");
    state.set_announcement(announcement);
    Json(BridgeApiResponse::ok(()))
}

pub(crate) async fn get_command(
    State(state): State<Arc<BridgeState>>,
) -> Json<BridgeApiResponse<Option<BridgeCommand>>> {
    let command = state.next_command();
    if let Some(command) = &command {
        trace!(?command, "dispatching command to bridge page");
    }
    Json(BridgeApiResponse::ok(command))
}

pub(crate) async fn post_response(
    State(state): State<Arc<BridgeState>>,
    Json(response): Json<RpcResponse>,
) -> Json<BridgeApiResponse<()>> {
    let id = response.id;
    if !state.add_response(response) {
        debug!(%id, "response for unknown request");
        return Json(BridgeApiResponse::error("Unknown request id"));
    }
    trace!(%id, "received response from bridge page");
    Json(BridgeApiResponse::ok(()))
}
