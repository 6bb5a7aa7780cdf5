// Copyright (c) 2026 Makani Suggest Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Implementation of the prefix query methods.
//!
//! `suggest` is a plain request/response query. `prefix` is the streaming
//! form: clients send it as a notification on every keystroke and receive a
//! `suggestions` notification for each one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::QueryGateway;
use crate::protocol::jsonrpc::error::JsonRpcError;
use crate::protocol::jsonrpc::handler::{JsonRpcHandler, MethodContext, MethodResult};

/// Method name for a one-shot prefix query.
pub const SUGGEST_METHOD: &str = "suggest";

/// Method name for the subscription-style prefix query.
pub const PREFIX_SUBSCRIPTION: &str = "prefix";

/// Event pushed in answer to a `prefix` notification.
pub const SUGGESTIONS_EVENT: &str = "suggestions";

/// Request parameters for the prefix query methods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestParams {
    /// The typed prefix; missing means the empty prefix
    #[serde(default)]
    pub prefix: String,

    /// Requested result count; anything non-numeric means "use the default"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Value>,
}

/// Registers the `suggest` method with the JSON-RPC handler.
pub fn register_suggest_method(handler: &mut JsonRpcHandler, gateway: QueryGateway) {
    handler.register_method(SUGGEST_METHOD, move |params, context| {
        let gateway = gateway.clone();
        async move { handle_suggest(&gateway, params, context) }
    });
}

/// Registers the `prefix` subscription with the JSON-RPC handler.
pub fn register_prefix_subscription(handler: &mut JsonRpcHandler, gateway: QueryGateway) {
    handler.register_subscription(
        PREFIX_SUBSCRIPTION,
        SUGGESTIONS_EVENT,
        move |params, context| {
            let gateway = gateway.clone();
            async move { handle_suggest(&gateway, params, context) }
        },
    );
}

/// Runs a prefix query and returns `{ prefix, suggestions }`.
pub fn handle_suggest(
    gateway: &QueryGateway,
    params: Option<Value>,
    _context: MethodContext,
) -> MethodResult {
    let params = match params {
        Some(Value::Null) | None => SuggestParams::default(),
        Some(params) => serde_json::from_value::<SuggestParams>(params).map_err(|err| {
            JsonRpcError::invalid_params(format!("expected a string `prefix`: {err}"))
        })?,
    };

    let limit = QueryGateway::limit_from_value(params.limit.as_ref());
    let suggestions = gateway.query(&params.prefix, limit);

    serde_json::to_value(suggestions).map_err(|err| JsonRpcError::internal_error(err.to_string()))
}
