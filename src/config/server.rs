//! Server configuration module.
//!
//! This module defines configuration related to the server itself,
//! including transport options, worker threads, and connection bounds.

use super::ConfigResult;
use super::Validate;
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Transport type for the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    /// Newline-delimited JSON-RPC over TCP
    #[default]
    Tcp,
    /// Newline-delimited JSON-RPC over standard input/output
    Stdio,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name of the server (used in logs and `status`)
    pub name: String,

    /// Transport to use for communication
    pub transport: TransportType,

    /// Address to bind to for the TCP transport
    pub address: SocketAddr,

    /// Number of runtime worker threads
    pub worker_threads: usize,

    /// Maximum number of simultaneously open TCP connections
    pub max_connections: usize,

    /// Maximum size of a single message line in bytes
    pub max_message_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "makani-suggest".to_string(),
            transport: TransportType::default(),
            address: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            worker_threads: num_cpus::get(),
            max_connections: 1024,
            max_message_size: 64 * 1024, // 64 KiB
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Server name cannot be empty".to_string(),
            ));
        }

        if self.worker_threads == 0 {
            return Err(ConfigError::ValidationError(
                "worker_threads must be greater than 0".to_string(),
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "max_connections must be greater than 0".to_string(),
            ));
        }

        // A message must at least fit a minimal JSON-RPC request
        if self.max_message_size < 64 {
            return Err(ConfigError::ValueOutOfRange {
                key: "server.max_message_size".to_string(),
                message: "must be at least 64 bytes".to_string(),
            });
        }

        Ok(())
    }
}
