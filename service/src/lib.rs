use config::Config;
use relay::Manager;
use std::sync::Arc;

pub mod config;
pub mod logging;

// Service-level state shared by every request handler
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub relay_manager: Arc<Manager>,
    pub config: Config,
}

impl AppState {
    /// Builds the state and starts the relay event loop. Must be called from
    /// within a tokio runtime.
    pub fn new(app_config: Config) -> Self {
        Self {
            relay_manager: Arc::new(Manager::start()),
            config: app_config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn clones_share_one_relay() {
        let app_state = AppState::new(Config::parse_from(["grpchat"]));
        let cloned = app_state.clone();
        assert!(Arc::ptr_eq(&app_state.relay_manager, &cloned.relay_manager));
        assert_eq!(cloned.relay_manager.connection_count(), 0);
    }
}
