use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the bridge page found when it loaded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAnnouncement {
    /// Whether the page sees an injected Ronin provider.
    pub found: bool,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
}

/// An EIP-1193 request waiting to be executed by the page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub id: Uuid,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: serde_json::Value) -> Self {
        Self { id: Uuid::new_v4(), method: method.into(), params }
    }
}

/// EIP-1193 provider error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

/// The page's answer to an [`RpcRequest`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub id: Uuid,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

/// Next thing the page should do.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BridgeCommand {
    /// Navigate a new tab to `url`.
    Open { url: String },
    /// Execute a provider request and post the response back.
    Rpc(RpcRequest),
}

/// Envelope of every `/api` answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BridgeApiResponse<T> {
    Ok { data: T },
    Error { message: String },
}

impl<T> BridgeApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self::Ok { data }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }
}
