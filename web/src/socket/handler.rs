use crate::error::{Error, ErrorKind, RelayFrameErrorKind};
use axum::body::Bytes;
use axum::extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use log::*;
use relay::connection::Outbound;
use service::AppState;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Upgrades `GET /socket` into a realtime chat connection.
pub(crate) async fn socket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

/// Runs one client connection: registers it with the relay, pumps inbound
/// text frames into the relay and relayed frames back out, then unregisters.
async fn handle_socket(socket: WebSocket, app_state: AppState) {
    let (ws_tx, mut ws_rx) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    let manager = app_state.relay_manager.clone();
    let connection_id = manager.connect(tx);

    let writer = tokio::spawn(write_frames(
        ws_tx,
        rx,
        app_state.config.heartbeat_interval(),
    ));

    while let Some(message) = ws_rx.next().await {
        match message {
            Ok(Message::Text(text)) => {
                let Err(e) = manager.receive(&connection_id, text.as_str()) else {
                    continue;
                };
                let e = Error::from(e);
                if e.error_kind == ErrorKind::Relay(RelayFrameErrorKind::InvalidFrame) {
                    warn!("Dropping invalid frame from connection {connection_id}: {e}");
                } else {
                    error!("Closing connection {connection_id}: {e}");
                    break;
                }
            }
            Ok(Message::Binary(_)) => {
                debug!("Ignoring binary frame from connection {connection_id}");
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Err(e) => {
                debug!("WebSocket error on connection {connection_id}: {e}");
                break;
            }
        }
    }

    manager.disconnect(&connection_id);
    writer.abort();
}

/// Forwards relayed frames to the socket and pings it every `heartbeat`.
async fn write_frames(
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut rx: UnboundedReceiver<Outbound>,
    heartbeat: Duration,
) {
    let mut ping_interval = tokio::time::interval(heartbeat);
    ping_interval.tick().await; // first tick completes immediately

    loop {
        tokio::select! {
            frame = rx.recv() => {
                let Some(frame) = frame else {
                    break;
                };
                if ws_tx.send(Message::Text(Utf8Bytes::from(&*frame))).await.is_err() {
                    break;
                }
            }
            _ = ping_interval.tick() => {
                if ws_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
                trace!("Sent ping");
            }
        }
    }
}
