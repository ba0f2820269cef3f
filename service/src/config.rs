use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::time::Duration;

/// Default TCP port the chat server listens on.
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "0.0.0.0")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Path of an HTML page served at `GET /` instead of the built-in chat page
    #[arg(short, long, env)]
    static_page: Option<String>,

    /// Seconds between WebSocket pings sent to each connected client
    #[arg(long, env, default_value_t = 25)]
    pub heartbeat_interval_secs: u64,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn interface(&self) -> &str {
        self.interface.as_deref().unwrap_or("0.0.0.0")
    }

    /// The `interface:port` pair handed to the TCP listener.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.interface(), self.port)
    }

    pub fn set_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn static_page(&self) -> Option<&str> {
        self.static_page.as_deref()
    }

    pub fn set_static_page(mut self, static_page: impl Into<String>) -> Self {
        self.static_page = Some(static_page.into());
        self
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_port_3000_on_all_interfaces() {
        let config = Config::parse_from(["grpchat"]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.listen_address(), "0.0.0.0:3000");
        assert_eq!(config.static_page(), None);
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(25));
        assert_eq!(config.log_level_filter, LevelFilter::Info);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::parse_from([
            "grpchat",
            "--interface",
            "127.0.0.1",
            "--port",
            "8080",
            "--static-page",
            "public/chat.html",
            "--heartbeat-interval-secs",
            "5",
            "--log-level-filter",
            "DEBUG",
        ]);
        assert_eq!(config.listen_address(), "127.0.0.1:8080");
        assert_eq!(config.static_page(), Some("public/chat.html"));
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(5));
        assert_eq!(config.log_level_filter, LevelFilter::Debug);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let result = Config::try_parse_from(["grpchat", "--log-level-filter", "LOUD"]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_heartbeat_is_clamped() {
        let config = Config::parse_from(["grpchat", "--heartbeat-interval-secs", "0"]);
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(1));
    }

    #[test]
    fn setters_replace_values() {
        let config = Config::parse_from(["grpchat"])
            .set_port(0)
            .set_static_page("other.html");
        assert_eq!(config.port, 0);
        assert_eq!(config.static_page(), Some("other.html"));
    }
}
