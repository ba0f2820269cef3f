//! WebSocket HTTP handler for the web layer.
//!
//! This module contains only the Axum upgrade handler and the per-socket
//! read/write loops. The relay itself (connection set, event loop, wire
//! envelope) lives in the `relay` crate.

pub mod handler;
