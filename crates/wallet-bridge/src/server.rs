use crate::{
    error::BridgeError,
    router::build_router,
    state::BridgeState,
    types::{ProviderAnnouncement, RpcRequest},
};
use std::{
    net::Ipv4Addr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

/// How often a pending request checks for the page's response.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Local HTTP server the bridge page talks to.
#[derive(Debug)]
pub struct BridgeServer {
    port: u16,
    open_browser: bool,
    request_timeout: Option<Duration>,
    state: Arc<BridgeState>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl BridgeServer {
    /// Creates a stopped server for `port`; `0` picks a free port on [`start`](Self::start).
    pub fn new(port: u16, open_browser: bool, request_timeout: Option<Duration>) -> Self {
        Self {
            port,
            open_browser,
            request_timeout,
            state: Arc::new(BridgeState::new()),
            shutdown: None,
            task: None,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", Ipv4Addr::LOCALHOST, self.port)
    }

    /// Whether the user should be prompted to open [`url`](Self::url).
    pub fn open_browser(&self) -> bool {
        self.open_browser
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn session_token(&self) -> &str {
        self.state.session_token()
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Handle for relaying requests through this server.
    pub fn handle(&self) -> BridgeHandle {
        BridgeHandle { state: self.state.clone(), request_timeout: self.request_timeout }
    }

    /// Binds to `127.0.0.1` and serves in the background.
    pub async fn start(&mut self) -> Result<(), BridgeError> {
        if self.is_running() {
            return Err(BridgeError::AlreadyRunning);
        }

        let listener =
            TcpListener::bind((Ipv4Addr::LOCALHOST, self.port)).await.map_err(BridgeError::Bind)?;
        self.port = listener.local_addr().map_err(BridgeError::Bind)?.port();

        let router = build_router(self.state.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(err) = server.await {
                error!(%err, "bridge server failed");
            }
        });

        debug!(port = self.port, "bridge server started");
        self.shutdown = Some(shutdown_tx);
        self.task = Some(task);
        Ok(())
    }

    /// Stops serving and waits for in-flight HTTP requests to finish.
    pub async fn stop(&mut self) -> Result<(), BridgeError> {
        let (Some(shutdown), Some(task)) = (self.shutdown.take(), self.task.take()) else {
            return Err(BridgeError::NotRunning);
        };
        let _ = shutdown.send(());
        task.await?;
        debug!(port = self.port, "bridge server stopped");
        Ok(())
    }
}

impl Drop for BridgeServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Cheap clonable access to a [`BridgeServer`]'s queues.
#[derive(Clone, Debug)]
pub struct BridgeHandle {
    state: Arc<BridgeState>,
    request_timeout: Option<Duration>,
}

impl BridgeHandle {
    /// The page's announcement, if it has loaded.
    pub fn announcement(&self) -> Option<ProviderAnnouncement> {
        self.state.announcement()
    }

    /// Waits up to `wait` for the page to announce itself.
    pub async fn wait_for_announcement(&self, wait: Duration) -> Option<ProviderAnnouncement> {
        let mut rx = self.state.subscribe_announcement();
        tokio::time::timeout(wait, rx.wait_for(Option::is_some)).await.ok()?.ok()?.clone()
    }

    /// Asks the page to open `url` in a new tab.
    pub fn open(&self, url: impl Into<String>) {
        self.state.add_navigation(url.into());
    }

    /// Number of requests the page has not answered yet.
    pub fn pending_requests(&self) -> usize {
        self.state.pending_requests()
    }

    /// Queues an EIP-1193 request for the page and waits for its answer.
    ///
    /// Waits forever unless the server was created with a request timeout.
    pub async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, BridgeError> {
        let request = RpcRequest::new(method, params);
        let id = request.id;
        trace!(%id, method, "queueing provider request");
        self.state.add_request(request);

        let started = Instant::now();
        loop {
            if let Some(response) = self.state.take_response(&id) {
                if let Some(err) = response.error {
                    return Err(err.into());
                }
                return Ok(response.result.unwrap_or(serde_json::Value::Null));
            }

            if let Some(timeout) = self.request_timeout
                && started.elapsed() > timeout
            {
                self.state.remove_request(&id);
                return Err(BridgeError::Timeout { method: method.to_string() });
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
