use crate::connection::{ConnectionId, ConnectionRegistry, Outbound};
use crate::error::{Error, Result};
use crate::message::Envelope;
use log::*;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Everything the event loop reacts to, queued in arrival order.
#[derive(Debug)]
pub enum RelayEvent {
    Connected {
        connection_id: ConnectionId,
        sender: UnboundedSender<Outbound>,
    },
    Received {
        connection_id: ConnectionId,
        envelope: Envelope,
    },
    Disconnected {
        connection_id: ConnectionId,
    },
}

/// Handle used by socket handlers to feed the relay.
pub struct Manager {
    registry: Arc<ConnectionRegistry>,
    events: UnboundedSender<RelayEvent>,
}

/// The consuming half of the relay: applies queued events one at a time.
pub struct EventLoop {
    registry: Arc<ConnectionRegistry>,
    events: UnboundedReceiver<RelayEvent>,
}

impl Manager {
    /// Create a manager and the event loop that serves it. The loop does
    /// nothing until `EventLoop::run` is awaited.
    pub fn new() -> (Self, EventLoop) {
        let registry = Arc::new(ConnectionRegistry::new());
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                registry: Arc::clone(&registry),
                events: tx,
            },
            EventLoop {
                registry,
                events: rx,
            },
        )
    }

    /// Create a manager and spawn its event loop on the current tokio runtime.
    pub fn start() -> Self {
        let (manager, event_loop) = Self::new();
        tokio::spawn(event_loop.run());
        manager
    }

    /// Register a new connection and return its unique ID
    pub fn connect(&self, sender: UnboundedSender<Outbound>) -> ConnectionId {
        let connection_id = ConnectionId::new();
        self.enqueue(RelayEvent::Connected {
            connection_id: connection_id.clone(),
            sender,
        });
        connection_id
    }

    /// Decode a text frame from `connection_id` and queue it for broadcast.
    ///
    /// Frames for events other than `msg` are accepted and dropped.
    pub fn receive(&self, connection_id: &ConnectionId, frame: &str) -> Result<()> {
        let envelope = Envelope::decode(frame)?;

        if !envelope.is_msg() {
            debug!(
                "Ignoring unsupported event '{}' from connection {}",
                envelope.event, connection_id
            );
            return Ok(());
        }

        self.events
            .send(RelayEvent::Received {
                connection_id: connection_id.clone(),
                envelope,
            })
            .map_err(|_| Error::relay_stopped())
    }

    /// Unregister a connection by ID
    pub fn disconnect(&self, connection_id: &ConnectionId) {
        self.enqueue(RelayEvent::Disconnected {
            connection_id: connection_id.clone(),
        });
    }

    /// Number of connections the event loop has registered so far.
    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    fn enqueue(&self, event: RelayEvent) {
        if let Err(e) = self.events.send(event) {
            warn!("Relay event loop has stopped, dropping {:?}", e.0);
        }
    }
}

impl EventLoop {
    /// Apply events until every `Manager` handle has been dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            self.handle(event);
        }
        debug!("Relay event loop finished");
    }

    fn handle(&self, event: RelayEvent) {
        match event {
            RelayEvent::Connected {
                connection_id,
                sender,
            } => {
                info!("a new user connected: {connection_id}");
                self.registry.register(connection_id, sender);
            }
            RelayEvent::Received {
                connection_id,
                envelope,
            } => {
                info!("{}", envelope.display_payload());

                let frame = match envelope.encode() {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to encode message from {connection_id}: {e}");
                        return;
                    }
                };

                let delivered = self.registry.broadcast(Arc::from(frame));
                debug!("Relayed message from {connection_id} to {delivered} connection(s)");
            }
            RelayEvent::Disconnected { connection_id } => {
                if self.registry.unregister(&connection_id) {
                    debug!("Connection {connection_id} closed, cleaning up");
                }
            }
        }
    }
}
