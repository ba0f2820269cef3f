//! HTTP and WebSocket surface of the chat relay.
//!
//! Routes:
//!
//! - `GET /` serves the static chat page
//! - `GET /socket` upgrades to the realtime channel
//! - `GET /health` liveness check

use log::*;
use service::config::Config;
use tokio::net::TcpListener;

pub use service::AppState;

pub mod error;
pub mod router;

mod controller;
mod socket;

pub use error::{Error, Result};

/// Binds the configured address and serves until the server loop fails.
pub async fn init_server(app_state: AppState) -> Result<()> {
    let listener = bind(&app_state.config).await?;
    serve(listener, app_state).await
}

/// Binds the TCP listener and logs the startup confirmation.
pub async fn bind(config: &Config) -> Result<TcpListener> {
    let listener = TcpListener::bind(config.listen_address())
        .await
        .map_err(Error::bind)?;
    let port = listener.local_addr().map_err(Error::bind)?.port();

    info!("the server has started listening on port {port}");

    Ok(listener)
}

pub async fn serve(listener: TcpListener, app_state: AppState) -> Result<()> {
    let router = router::define_routes(app_state);
    axum::serve(listener, router).await.map_err(Error::serve)
}
