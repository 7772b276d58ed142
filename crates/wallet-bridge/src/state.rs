use crate::{
    queue::RequestQueue,
    types::{BridgeCommand, ProviderAnnouncement, RpcRequest, RpcResponse},
};
use parking_lot::Mutex;
use std::{collections::VecDeque, sync::Arc};
use tokio::sync::watch;
use uuid::Uuid;

/// State shared between the HTTP handlers and the connector side of the bridge.
#[derive(Debug, Clone)]
pub(crate) struct BridgeState {
    /// Token the page must present on every `/api` call.
    session_token: Arc<String>,
    /// Latest provider announcement from the page.
    announcement: Arc<watch::Sender<Option<ProviderAnnouncement>>>,
    /// Pages the page should open, oldest first.
    navigations: Arc<Mutex<VecDeque<String>>>,
    /// Provider requests and their responses.
    requests: Arc<Mutex<RequestQueue<RpcRequest, RpcResponse>>>,
}

impl Default for BridgeState {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeState {
    pub fn new() -> Self {
        Self {
            session_token: Arc::new(Uuid::new_v4().simple().to_string()),
            announcement: Arc::new(watch::Sender::new(None)),
            navigations: Arc::default(),
            requests: Arc::default(),
        }
    }

    pub fn session_token(&self) -> &Arc<String> {
        &self.session_token
    }

    pub fn announcement(&self) -> Option<ProviderAnnouncement> {
        self.announcement.borrow().clone()
    }

    /// Records a (re)loaded page. Requests handed to a previous page that never answered are
    /// handed out again, since that page is gone.
    pub fn set_announcement(&self, announcement: ProviderAnnouncement) {
        let resent = self.requests.lock().redispatch();
        if resent > 0 {
            debug!(resent, "bridge page reloaded, resending unanswered requests");
        }
        self.announcement.send_replace(Some(announcement));
    }

    pub fn subscribe_announcement(&self) -> watch::Receiver<Option<ProviderAnnouncement>> {
        self.announcement.subscribe()
    }

    pub fn add_navigation(&self, url: String) {
        self.navigations.lock().push_back(url);
    }

    pub fn add_request(&self, request: RpcRequest) {
        self.requests.lock().add_request(request);
    }

    pub fn remove_request(&self, id: &Uuid) {
        self.requests.lock().remove_request(id);
    }

    /// Next command for the page: pending navigations first, then the oldest request that was
    /// not handed out yet.
    pub fn next_command(&self) -> Option<BridgeCommand> {
        if let Some(url) = self.navigations.lock().pop_front() {
            return Some(BridgeCommand::Open { url });
        }
        self.requests.lock().dispatch_next().map(BridgeCommand::Rpc)
    }

    /// Records the page's response. Returns `false` if no request with that id is pending.
    pub fn add_response(&self, response: RpcResponse) -> bool {
        self.requests.lock().add_response(response.id, response)
    }

    pub fn take_response(&self, id: &Uuid) -> Option<RpcResponse> {
        self.requests.lock().take_response(id)
    }

    pub fn pending_requests(&self) -> usize {
        self.requests.lock().pending()
    }
}
