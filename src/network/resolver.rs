use async_trait::async_trait;
use std::net::IpAddr;
use tracing::{debug, warn};

use super::types::ClientContext;

/// Room every client lands in when no network context is available.
///
/// A shared fallback room is a demo limitation, not a correctness issue: it
/// keeps the system usable behind proxies that strip the source address, at
/// the cost of mixing those clients into one room.
pub const DEFAULT_ROOM_ID: &str = "room-open";

/// Maps a connecting client to its logical room.
///
/// Resolution must be deterministic for a given client context and must never
/// leak identifiers from other rooms; the resolver's output is the only room
/// key the handlers ever use.
#[async_trait]
pub trait RoomResolver: Send + Sync {
    async fn resolve(&self, client: &ClientContext) -> String;

    /// Display label for the client's network, e.g. "192.168.1.x".
    async fn network_label(&self, client: &ClientContext) -> String;
}

/// Resolver that derives the room from the client's source address.
///
/// An explicit room code wins over address derivation. IPv4 addresses map to
/// their /24 prefix, IPv6 to their /64 prefix, approximating "same local
/// network". Loopback and missing addresses fall back to [`DEFAULT_ROOM_ID`].
pub struct AddressRoomResolver;

impl AddressRoomResolver {
    pub fn new() -> Self {
        Self
    }

    fn room_for_ip(ip: &IpAddr) -> Option<String> {
        match ip {
            IpAddr::V4(v4) => {
                if v4.is_loopback() || v4.is_unspecified() {
                    return None;
                }
                let [a, b, c, _] = v4.octets();
                Some(format!("net-{}-{}-{}-0", a, b, c))
            }
            IpAddr::V6(v6) => {
                if v6.is_loopback() || v6.is_unspecified() {
                    return None;
                }
                let segments = v6.segments();
                Some(format!(
                    "net6-{:x}-{:x}-{:x}-{:x}",
                    segments[0], segments[1], segments[2], segments[3]
                ))
            }
        }
    }

    fn label_for_ip(ip: &IpAddr) -> Option<String> {
        match ip {
            IpAddr::V4(v4) => {
                if v4.is_loopback() || v4.is_unspecified() {
                    return None;
                }
                let [a, b, c, _] = v4.octets();
                Some(format!("{}.{}.{}.x", a, b, c))
            }
            IpAddr::V6(v6) => {
                if v6.is_loopback() || v6.is_unspecified() {
                    return None;
                }
                let segments = v6.segments();
                Some(format!(
                    "{:x}:{:x}:{:x}:{:x}::x",
                    segments[0], segments[1], segments[2], segments[3]
                ))
            }
        }
    }
}

impl Default for AddressRoomResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomResolver for AddressRoomResolver {
    async fn resolve(&self, client: &ClientContext) -> String {
        if let Some(code) = &client.room_code {
            let room_id = format!("code-{}", code.to_lowercase());
            debug!(room_id = %room_id, "Resolved room from explicit room code");
            return room_id;
        }

        match client.remote_addr.as_ref().and_then(Self::room_for_ip) {
            Some(room_id) => {
                debug!(room_id = %room_id, "Resolved room from client address");
                room_id
            }
            None => {
                warn!(
                    remote_addr = ?client.remote_addr,
                    "No usable network context, falling back to the shared room"
                );
                DEFAULT_ROOM_ID.to_string()
            }
        }
    }

    async fn network_label(&self, client: &ClientContext) -> String {
        if let Some(code) = &client.room_code {
            return code.clone();
        }

        client
            .remote_addr
            .as_ref()
            .and_then(Self::label_for_ip)
            .unwrap_or_else(|| "shared network".to_string())
    }
}

/// Resolver pinned to a single room, for tests and single-room deployments.
pub struct FixedRoomResolver {
    room_id: String,
}

impl FixedRoomResolver {
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
        }
    }
}

#[async_trait]
impl RoomResolver for FixedRoomResolver {
    async fn resolve(&self, _client: &ClientContext) -> String {
        self.room_id.clone()
    }

    async fn network_label(&self, _client: &ClientContext) -> String {
        self.room_id.clone()
    }
}
