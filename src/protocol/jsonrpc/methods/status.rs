// Copyright (c) 2026 Makani Suggest Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Implementation of the JSON-RPC "status" method handler.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::jsonrpc::error::JsonRpcError;
use crate::protocol::jsonrpc::handler::{JsonRpcHandler, MethodContext, MethodResult};
use crate::sync::IndexSynchronizer;
use crate::transport::session::SessionRegistry;

/// Method name for server status.
pub const STATUS_METHOD: &str = "status";

/// Result of the status method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResult {
    /// Configured server name
    pub name: String,

    /// Crate version
    pub version: String,

    /// Number of words in the index
    pub words: usize,

    /// Number of open client connections
    pub connections: usize,
}

/// Registers the status method handler with the JSON-RPC handler.
pub fn register_status_method(
    handler: &mut JsonRpcHandler,
    name: String,
    synchronizer: IndexSynchronizer,
    sessions: Arc<SessionRegistry>,
) {
    handler.register_method(STATUS_METHOD, move |params, context| {
        let result = handle_status(&name, &synchronizer, &sessions, params, context);
        async move { result }
    });
}

/// Handles the status method call. Parameters are ignored.
pub fn handle_status(
    name: &str,
    synchronizer: &IndexSynchronizer,
    sessions: &SessionRegistry,
    _params: Option<Value>,
    _context: MethodContext,
) -> MethodResult {
    let status = StatusResult {
        name: name.to_string(),
        version: crate::VERSION.to_string(),
        words: synchronizer.word_count(),
        connections: sessions.len(),
    };

    serde_json::to_value(status).map_err(|err| JsonRpcError::internal_error(err.to_string()))
}
