use dashmap::DashMap;
use log::*;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// An encoded text frame queued for delivery to one socket.
pub type Outbound = Arc<str>;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of currently open connections, keyed by connection id.
///
/// Membership is managed by the transport layer only: a connection is added
/// when its socket is upgraded and removed when the socket closes.
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, UnboundedSender<Outbound>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register a connection's outbound queue - O(1)
    pub fn register(&self, connection_id: ConnectionId, sender: UnboundedSender<Outbound>) {
        self.connections.insert(connection_id, sender);
    }

    /// Unregister a connection - O(1). Returns whether it was registered.
    pub fn unregister(&self, connection_id: &ConnectionId) -> bool {
        self.connections.remove(connection_id).is_some()
    }

    /// Queue a frame for every registered connection - O(n).
    ///
    /// Returns the number of connections the frame was queued for. A queue
    /// whose socket has already gone away is skipped.
    pub fn broadcast(&self, frame: Outbound) -> usize {
        let mut delivered = 0;
        for entry in self.connections.iter() {
            match entry.value().send(Arc::clone(&frame)) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(
                    "Failed to send broadcast to connection {}: {}",
                    entry.key().as_str(),
                    e
                ),
            }
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
