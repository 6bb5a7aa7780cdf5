// Copyright (c) 2026 Makani Suggest Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Types for the JSON-RPC 2.0 protocol.
//!
//! This module defines the core data structures for JSON-RPC 2.0 requests, responses, and
//! related types according to the [specification](https://www.jsonrpc.org/specification).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::JsonRpcError;

/// JSON-RPC protocol version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request identifier.
///
/// Can be a string, number, or null as per the JSON-RPC 2.0 specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Id {
    /// String identifier
    String(String),

    /// Numeric identifier
    Number(i64),

    /// Null identifier (discouraged but valid JSON-RPC)
    Null,
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::String(s) => write!(f, "{}", s),
            Id::Number(n) => write!(f, "{}", n),
            Id::Null => write!(f, "null"),
        }
    }
}

/// A JSON-RPC 2.0 request object.
///
/// Without an `id` the request is a notification. The server answers
/// notifications only for subscription methods, and then with a
/// notification of its own.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Request {
    /// JSON-RPC protocol version, always "2.0"
    pub jsonrpc: String,

    /// Name of the method to be invoked
    pub method: String,

    /// Method parameters, can be positional (array) or named (object)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,

    /// Request identifier, if None then the request is a notification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
}

impl Request {
    /// Creates a new JSON-RPC 2.0 request.
    pub fn new(
        method: impl Into<String>,
        params: Option<serde_json::Value>,
        id: Option<Id>,
    ) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }

    /// Returns true if this request is a notification (no id).
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Creates a new JSON-RPC request with a numeric id.
    pub fn with_number_id(
        method: impl Into<String>,
        params: Option<serde_json::Value>,
        id: i64,
    ) -> Self {
        Self::new(method, params, Some(Id::Number(id)))
    }

    /// Creates a new JSON-RPC notification (no id).
    pub fn notification(method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self::new(method, params, None)
    }
}

/// A JSON-RPC 2.0 notification object.
///
/// Structurally a Request without an id; used for both inbound subscription
/// requests and outbound `suggestions` events.
pub type Notification = Request;

/// A JSON-RPC 2.0 response object.
///
/// This type represents a response to a JSON-RPC request. It contains either a result or an error.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Response {
    /// JSON-RPC protocol version, always "2.0"
    pub jsonrpc: String,

    /// The result of the method invocation, if successful. Must be null if error is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,

    /// The error object, if an error occurred. Must be null if result is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,

    /// Same identifier as the request this is responding to
    pub id: Id,
}

impl Response {
    /// Creates a new successful JSON-RPC 2.0 response.
    pub fn success(id: Id, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Creates a new error JSON-RPC 2.0 response.
    pub fn error(id: Id, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// Returns true if this response contains a successful result.
    pub fn is_success(&self) -> bool {
        self.result.is_some() && self.error.is_none()
    }

    /// Returns true if this response contains an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A batch of JSON-RPC 2.0 requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(transparent)]
pub struct BatchRequest {
    /// The list of requests in this batch
    pub requests: Vec<Request>,
}
