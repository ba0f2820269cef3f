//! Broadcast relay infrastructure for the chat server.
//!
//! This crate owns the live connection set and the single event loop that
//! rebroadcasts every chat message to every connected client, including the
//! sender.
//!
//! # Architecture
//!
//! - **Transport-owned registry**: `ConnectionRegistry` holds one outbound
//!   queue per open socket. Application code never touches it directly and
//!   only reaches it through the "broadcast to all" primitive.
//! - **Single event loop**: connects, messages and disconnects are queued on
//!   one channel and handled one at a time, in arrival order, by `EventLoop`.
//! - **Opaque payloads**: message payloads are carried as `serde_json::Value`
//!   and are never inspected or rewritten.
//! - **Ephemeral**: no history. A client that joins late misses earlier
//!   messages, and a client that left is no longer a recipient.
//!
//! # Message Flow
//!
//! 1. Browser opens a WebSocket on `/socket`
//! 2. The socket handler calls `Manager::connect`, which assigns a
//!    `ConnectionId` and queues a `Connected` event
//! 3. Each text frame is handed to `Manager::receive`, decoded into an
//!    `Envelope` and queued as a `Received` event
//! 4. The event loop logs the payload and broadcasts the re-encoded envelope
//!    to every registered connection
//! 5. When the socket closes the handler calls `Manager::disconnect`
//!
//! # Example
//!
//! ```rust,ignore
//! let manager = relay::Manager::start();
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let id = manager.connect(tx);
//! manager.receive(&id, r#"{"event":"msg","data":"hello"}"#)?;
//! assert_eq!(&*rx.recv().await.unwrap(), r#"{"event":"msg","data":"hello"}"#);
//! ```
//!
//! # Modules
//!
//! - `connection`: ConnectionRegistry and the type-safe ConnectionId
//! - `manager`: connect/receive/disconnect hooks and the event loop
//! - `message`: the `{event, data}` wire envelope
//! - `error`: relay error types

pub mod connection;
pub mod error;
pub mod manager;
pub mod message;

pub use manager::{EventLoop, Manager};
