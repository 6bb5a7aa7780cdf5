//! Transport error module.
//!
//! This module defines error types that may occur in the TCP and stdio
//! line transports.

use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors that can occur during transport operations.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Error when the listener cannot bind.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        /// The address we tried to bind
        address: SocketAddr,
        /// The underlying error
        #[source]
        source: io::Error,
    },

    /// Error when accepting a connection.
    #[error("Accept error: {0}")]
    Accept(#[source] io::Error),

    /// Error when reading a message from the peer.
    #[error("Read error: {0}")]
    Read(#[source] io::Error),

    /// Error when writing a message to the peer.
    #[error("Write error: {0}")]
    Write(#[source] io::Error),

    /// Error when the peer sends a line longer than allowed.
    #[error("Message of {size} bytes exceeds limit of {limit} bytes")]
    MessageTooLarge {
        /// Size of the offending message so far
        size: usize,
        /// Configured maximum message size
        limit: usize,
    },
}

/// Result type alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
