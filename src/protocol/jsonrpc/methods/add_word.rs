// Copyright (c) 2026 Makani Suggest Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Implementation of the JSON-RPC "add_word" method handler.
//!
//! Adding a word is the only write the server accepts. The word goes through
//! the synchronizer, which persists it before making it visible to queries.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::protocol::jsonrpc::error::JsonRpcError;
use crate::protocol::jsonrpc::handler::{JsonRpcHandler, MethodContext, MethodResult};
use crate::sync::IndexSynchronizer;

/// Method name for adding a word.
pub const ADD_WORD_METHOD: &str = "add_word";

/// Message returned on every successful write, new or duplicate.
pub const ADD_WORD_SUCCESS_MESSAGE: &str = "Word added successfully";

/// Request parameters for the add_word method.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddWordParams {
    /// The word to add; a missing value is treated as empty
    #[serde(default)]
    pub text: String,
}

/// Registers the add_word method handler with the JSON-RPC handler.
pub fn register_add_word_method(handler: &mut JsonRpcHandler, synchronizer: IndexSynchronizer) {
    handler.register_method(ADD_WORD_METHOD, move |params, context| {
        let synchronizer = synchronizer.clone();
        async move { handle_add_word(&synchronizer, params, context).await }
    });
}

/// Handles the add_word method call.
pub async fn handle_add_word(
    synchronizer: &IndexSynchronizer,
    params: Option<Value>,
    context: MethodContext,
) -> MethodResult {
    let params = match params {
        Some(Value::Null) | None => AddWordParams::default(),
        Some(params) => serde_json::from_value::<AddWordParams>(params).map_err(|err| {
            JsonRpcError::invalid_params(format!("add_word expects a string `text`: {err}"))
        })?,
    };

    match synchronizer.apply_write(&params.text).await {
        Ok(ack) => Ok(json!({
            "success": true,
            "message": ADD_WORD_SUCCESS_MESSAGE,
            "word": ack.word,
            "inserted": ack.inserted,
        })),
        Err(err) => {
            debug!(session = ?context.session, error = %err, "add_word rejected");
            Err(JsonRpcError::from(&err))
        }
    }
}
