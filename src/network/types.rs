use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

/// Header a client may set to join an explicit room instead of the one
/// derived from its source address.
pub const ROOM_CODE_HEADER: &str = "x-room-code";

/// What the server knows about a connecting client when resolving its room.
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    pub remote_addr: Option<IpAddr>,
    pub room_code: Option<String>,
}

impl ClientContext {
    pub fn from_parts(remote_addr: Option<SocketAddr>, headers: &HeaderMap) -> Self {
        let room_code = headers
            .get(ROOM_CODE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Self {
            remote_addr: remote_addr.map(|addr| addr.ip()),
            room_code,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // ConnectInfo is only present when the server is built with
        // into_make_service_with_connect_info; handler tests run without it.
        let remote_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(ClientContext::from_parts(remote_addr, &parts.headers))
    }
}

/// Response for the network status endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct NetworkStatusResponse {
    pub room_id: String,
    /// Display label for the network, e.g. "192.168.1.x"
    pub network_label: String,
    /// Number of live WebSocket connections in this room
    pub device_count: usize,
}
