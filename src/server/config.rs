//! Server configuration
//!
//! Loads the echo server settings from `config.toml` with `TCP_SOCK_*`
//! environment overrides, falling back to built-in defaults.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Server configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Listening port on `INADDR_ANY`
    pub port: u16,
    /// Pool capacity, also used as the listen backlog
    pub max_clients: usize,
    /// `SO_RCVBUF` for the listener and accepted clients
    pub rx_buffer_size: usize,
    /// `SO_SNDBUF` for the listener and accepted clients
    pub tx_buffer_size: usize,
    pub recv_timeout_ms: u64,
    pub liveness_interval_ms: u64,
    /// Size of each session's receive buffer
    pub message_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 12347,
            max_clients: 5,
            rx_buffer_size: 64 * 1024,
            tx_buffer_size: 64 * 1024,
            recv_timeout_ms: 1000,
            liveness_interval_ms: 1000,
            message_buffer_size: 1024,
        }
    }
}

impl ServerConfig {
    /// Load configuration from ./config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from `path`; a missing file leaves the defaults.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();

        let settings = Config::builder()
            .set_default("port", defaults.port as i64)?
            .set_default("max_clients", defaults.max_clients as i64)?
            .set_default("rx_buffer_size", defaults.rx_buffer_size as i64)?
            .set_default("tx_buffer_size", defaults.tx_buffer_size as i64)?
            .set_default("recv_timeout_ms", defaults.recv_timeout_ms as i64)?
            .set_default("liveness_interval_ms", defaults.liveness_interval_ms as i64)?
            .set_default("message_buffer_size", defaults.message_buffer_size as i64)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("TCP_SOCK").try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        if config.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }
        config.validate()?;
        Ok(config)
    }

    /// Validation for the limits every server needs.
    ///
    /// Port 0 passes here so a server built in code can bind an ephemeral
    /// port; [`ServerConfig::load_from`] rejects it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_clients == 0 {
            return Err(ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.max_clients > i32::MAX as usize {
            return Err(ConfigError::Message(
                "max_clients does not fit a listen backlog".into(),
            ));
        }

        if self.rx_buffer_size == 0 || self.tx_buffer_size == 0 {
            return Err(ConfigError::Message(
                "socket buffer sizes must be greater than 0".into(),
            ));
        }

        // setsockopt takes the size as a C int
        if self.rx_buffer_size > i32::MAX as usize || self.tx_buffer_size > i32::MAX as usize {
            return Err(ConfigError::Message(
                "socket buffer sizes must not exceed i32::MAX".into(),
            ));
        }

        if self.message_buffer_size == 0 {
            return Err(ConfigError::Message(
                "message_buffer_size must be greater than 0".into(),
            ));
        }

        if self.recv_timeout_ms == 0 || self.liveness_interval_ms == 0 {
            return Err(ConfigError::Message(
                "recv_timeout_ms and liveness_interval_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Listen backlog for `max_clients`
    pub fn backlog(&self) -> i32 {
        i32::try_from(self.max_clients).unwrap_or(i32::MAX)
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }

    pub fn liveness_interval(&self) -> Duration {
        Duration::from_millis(self.liveness_interval_ms)
    }
}
