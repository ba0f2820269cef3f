use anyhow::Result;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use log::*;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub data: Value,
    pub timestamp: Instant,
}

pub struct Connection {
    pub user_label: String,
    sink: WsSink,
    event_rx: mpsc::UnboundedReceiver<Event>,
    _handle: tokio::task::JoinHandle<()>,
}

impl Connection {
    pub async fn establish(base_url: &str, user_label: String) -> Result<Self> {
        let url = format!("{}/socket", base_url.trim_end_matches('/'));
        let (stream, _) = connect_async(url.as_str()).await?;
        let (sink, mut source) = stream.split();
        let (tx, rx) = mpsc::unbounded_channel();

        let label = user_label.clone();
        let handle = tokio::spawn(async move {
            loop {
                match source.next().await {
                    Some(Ok(Message::Text(text))) => {
                        let Ok(frame) = serde_json::from_str::<Value>(text.as_str()) else {
                            warn!("Unparseable frame for {}: {}", label, text.as_str());
                            continue;
                        };
                        let event = Event {
                            event_type: frame["event"].as_str().unwrap_or_default().to_string(),
                            data: frame["data"].clone(),
                            timestamp: Instant::now(),
                        };

                        if tx.send(event).is_err() {
                            debug!("Event receiver dropped for {}", label);
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("Socket closed for {}", label);
                        break;
                    }
                    Some(Ok(_)) => {
                        // Ignore pings and binary frames
                    }
                    Some(Err(e)) => {
                        warn!("Socket error for {}: {}", label, e);
                        break;
                    }
                }
            }
        });

        Ok(Self {
            user_label,
            sink,
            event_rx: rx,
            _handle: handle,
        })
    }

    pub async fn emit(&mut self, event_type: &str, data: Value) -> Result<()> {
        let frame = json!({ "event": event_type, "data": data }).to_string();
        self.sink.send(Message::text(frame)).await?;
        Ok(())
    }

    pub async fn close(mut self) -> Result<()> {
        self.sink.send(Message::Close(None)).await?;
        Ok(())
    }

    pub async fn wait_for_event(&mut self, event_type: &str, timeout: Duration) -> Result<Event> {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                anyhow::bail!("Timeout waiting for event: {}", event_type);
            }

            match tokio::time::timeout(remaining, self.event_rx.recv()).await {
                Ok(Some(event)) if event.event_type == event_type => {
                    return Ok(event);
                }
                Ok(Some(_)) => {
                    // Wrong event type, keep waiting
                    continue;
                }
                Ok(None) => {
                    anyhow::bail!("Socket closed");
                }
                Err(_) => {
                    anyhow::bail!("Timeout waiting for event: {}", event_type);
                }
            }
        }
    }

    /// Discards events already received, so a scenario starts from a clean slate.
    pub fn drain(&mut self) -> usize {
        let mut discarded = 0;
        while self.event_rx.try_recv().is_ok() {
            discarded += 1;
        }
        discarded
    }

    /// Succeeds if no event of `event_type` arrives within `window`.
    pub async fn expect_silence(&mut self, event_type: &str, window: Duration) -> Result<()> {
        match self.wait_for_event(event_type, window).await {
            Ok(event) => anyhow::bail!("Unexpected {} event: {}", event_type, event.data),
            Err(_) => Ok(()),
        }
    }
}
