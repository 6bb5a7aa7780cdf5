// Copyright (c) 2026 Makani Suggest Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! JSON-RPC 2.0 protocol handler for the Makani Suggest server.
//!
//! This module implements the [JSON-RPC 2.0 specification](https://www.jsonrpc.org/specification),
//! providing utilities for parsing, validating, and handling JSON-RPC requests and responses.
//! It supports both single requests/responses and batched operations as per the specification.
//!
//! # Features
//!
//! - Requests, notifications, and responses
//! - Batch request/response handling
//! - Subscription methods that answer notifications with pushed events
//! - Standardized error codes, with write failures mapped onto them
//! - Asynchronous handler support
//!
//! # Example
//!
//! ```
//! use makani_suggest_lib::protocol::jsonrpc::{JsonRpcHandler, MethodContext};
//!
//! # tokio_test::block_on(async {
//! let mut handler = JsonRpcHandler::new();
//!
//! handler.register_method("echo", |params, _ctx| async move {
//!     Ok(params.unwrap_or(serde_json::Value::Null))
//! });
//!
//! let request = r#"{"jsonrpc": "2.0", "method": "echo", "params": {"word": "apple"}, "id": 1}"#;
//! let lines = handler.handle_message(request, MethodContext::default()).await;
//!
//! assert_eq!(lines.len(), 1);
//! assert!(lines[0].contains(r#""result":{"word":"apple"}"#));
//! # });
//! ```

pub mod error;
pub mod handler;
pub mod methods;
pub mod setup;
pub mod types;
pub mod validation;

// Re-exports
pub use error::{Error, ErrorCode, JsonRpcError, Result};
pub use handler::{
    JsonRpcHandler, MethodContext, MethodHandler, MethodHandlerFn, MethodHandlerFuture,
    MethodResult, Outbound,
};
pub use setup::{create_handler, register_standard_methods, ServerState};
pub use types::{BatchRequest, Id, Notification, Request, Response};
pub use validation::{validate_request, ValidatedRequest};

#[cfg(test)]
mod tests;
