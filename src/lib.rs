//! Makani Suggest Library
//!
//! This library contains the core components of the Makani Suggest server:
//! the prefix index, the durable word store, the synchronizer that keeps the
//! two consistent, the query gateway, and the JSON-RPC protocol and
//! transports that expose them. The binary crate wires them together.
//!
//! # Architecture
//!
//! - Writes go through [`sync::IndexSynchronizer`]: store first, index second
//! - Reads go through [`gateway::QueryGateway`] and only ever take a read lock
//! - The index is passed explicitly; there is no global state besides the
//!   error reporter

// Re-export public modules
pub mod config;
pub mod data_structures;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod seed;
pub mod store;
pub mod sync;
pub mod transport;
pub mod word;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for the Makani Suggest server.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization function.
///
/// Installs the tracing-backed error reporter. Safe to call more than once.
pub fn init() {
    error::set_error_reporter(std::sync::Arc::new(error::TracingErrorReporter));
}
