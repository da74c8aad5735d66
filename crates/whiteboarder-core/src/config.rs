//! Client configuration.

use crate::throttle::DEFAULT_CURSOR_THROTTLE;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default board-CRUD server.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
/// Relay endpoint path on the server.
pub const RELAY_PATH: &str = "/ws";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),
}

/// Where the client talks to and how often it polls.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the board-CRUD service.
    pub server_url: String,
    /// Relay WebSocket URL. Derived from `server_url` when unset.
    pub relay_url: Option<String>,
    /// Minimum gap between cursor broadcasts.
    pub cursor_throttle: Duration,
    /// How often the driver polls the channel and flushes the throttle.
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            relay_url: None,
            cursor_throttle: DEFAULT_CURSOR_THROTTLE,
            poll_interval: Duration::from_millis(20),
        }
    }
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    /// Relay URL: the explicit one, or the server URL with `http` swapped for
    /// `ws` (`https` for `wss`) and the path set to `/ws`.
    pub fn relay_url(&self) -> Result<String, ConfigError> {
        if let Some(relay) = &self.relay_url {
            return Ok(relay.clone());
        }
        let mut url = Url::parse(&self.server_url)?;
        let scheme = match url.scheme() {
            "http" => "ws",
            "https" => "wss",
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        };
        url.set_scheme(scheme)
            .map_err(|()| ConfigError::UnsupportedScheme(scheme.to_string()))?;
        url.set_path(RELAY_PATH);
        url.set_query(None);
        url.set_fragment(None);
        Ok(url.to_string())
    }
}
