//! Configuration management for the RAX chat server
//!
//! Loads settings from an optional `config.toml` with environment overrides
//! (`RAX_CHAT_*`). Every key has a default so the server runs without a
//! config file; the listening port itself comes from the command line.

use config::{Config, Environment, File};
use serde::Deserialize;

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind the listening socket
    pub bind_address: String,

    /// Maximum concurrent connections; a full table rejects new ones
    pub max_clients: usize,

    /// Maximum display name length in bytes
    pub max_name_length: usize,

    /// Maximum accepted line length in bytes, terminator included
    pub max_message_length: usize,

    /// Seconds a session may sit idle before it is disconnected (0 = never)
    pub idle_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            max_clients: 20,
            max_name_length: 20,
            max_message_length: 512,
            idle_timeout_secs: 0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `config.toml` (if present) with `RAX_CHAT_*`
    /// environment overrides on top of the built-in defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = ServerConfig::default();

        let settings = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("max_clients", defaults.max_clients as i64)?
            .set_default("max_name_length", defaults.max_name_length as i64)?
            .set_default("max_message_length", defaults.max_message_length as i64)?
            .set_default("idle_timeout_secs", defaults.idle_timeout_secs as i64)?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("RAX_CHAT"))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.bind_address.is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.max_name_length == 0 {
            return Err(config::ConfigError::Message(
                "max_name_length must be greater than 0".into(),
            ));
        }

        // A line must at least fit "JOIN " plus a name and the terminator.
        if self.max_message_length < self.max_name_length + 6 {
            return Err(config::ConfigError::Message(
                "max_message_length too small to carry a JOIN command".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as a socket address string
    pub fn listen_socket(&self, port: u16) -> String {
        format!("{}:{}", self.bind_address, port)
    }

    /// Get the idle timeout as a Duration, if one is configured
    pub fn idle_timeout(&self) -> Option<std::time::Duration> {
        if self.idle_timeout_secs == 0 {
            None
        } else {
            Some(std::time::Duration::from_secs(self.idle_timeout_secs))
        }
    }
}
