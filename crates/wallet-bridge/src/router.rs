use crate::{handlers, state::BridgeState};
use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use std::sync::Arc;

/// Header carrying the per-session token on `/api` calls.
pub const SESSION_TOKEN_HEADER: &str = "X-Session-Token";

pub(crate) fn build_router(state: Arc<BridgeState>) -> Router {
    let api = Router::new()
        .route("/provider", post(handlers::post_provider))
        .route("/command", get(handlers::get_command))
        .route("/response", post(handlers::post_response))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session_token))
        .with_state(state.clone());

    Router::new().route("/", get(handlers::serve_index)).nest("/api", api).with_state(state)
}

async fn require_session_token(
    State(state): State<Arc<BridgeState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let ok = req
        .headers()
        .get(SESSION_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == state.session_token().as_str());

    if !ok {
        trace!(uri = %req.uri(), "rejected bridge call without a valid session token");
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(req).await)
}
