// Copyright (c) 2026 Makani Suggest Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Setup and initialization utilities for the JSON-RPC handler.
//!
//! This module wires the autocomplete services into a ready-to-use
//! [`JsonRpcHandler`].

use std::sync::Arc;

use crate::gateway::QueryGateway;
use crate::protocol::jsonrpc::handler::JsonRpcHandler;
use crate::protocol::jsonrpc::methods::{
    register_add_word_method, register_prefix_subscription, register_status_method,
    register_suggest_method,
};
use crate::sync::IndexSynchronizer;
use crate::transport::session::SessionRegistry;

/// Services shared by every connection.
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Name reported by `status`
    pub name: String,

    /// Write path
    pub synchronizer: IndexSynchronizer,

    /// Read path
    pub gateway: QueryGateway,

    /// Open connections
    pub sessions: Arc<SessionRegistry>,
}

/// Registers all standard method handlers with the JSON-RPC handler.
pub fn register_standard_methods(handler: &mut JsonRpcHandler, state: &ServerState) {
    register_add_word_method(handler, state.synchronizer.clone());
    register_suggest_method(handler, state.gateway.clone());
    register_prefix_subscription(handler, state.gateway.clone());
    register_status_method(
        handler,
        state.name.clone(),
        state.synchronizer.clone(),
        Arc::clone(&state.sessions),
    );
}

/// Creates a fully configured JSON-RPC handler with all standard methods.
pub fn create_handler(state: &ServerState) -> JsonRpcHandler {
    let mut handler = JsonRpcHandler::new();
    register_standard_methods(&mut handler, state);
    handler
}
