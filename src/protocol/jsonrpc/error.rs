// Copyright (c) 2026 Makani Suggest Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the JSON-RPC 2.0 protocol handler.
//!
//! This module defines error codes and error types according to the
//! [JSON-RPC 2.0 specification](https://www.jsonrpc.org/specification#error_object),
//! plus the mapping from write-path failures onto those codes.

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::error::WriteError;

/// JSON-RPC 2.0 error codes used by the server.
///
/// The error codes -32700, -32600, -32601, -32602, and -32603 are standard
/// JSON-RPC 2.0 errors. -32000 is the first implementation-defined server error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Parse error (-32700)
    /// Invalid JSON was received by the server.
    ParseError = -32700,

    /// Invalid Request (-32600)
    /// The JSON sent is not a valid Request object.
    InvalidRequest = -32600,

    /// Method not found (-32601)
    /// The method does not exist / is not available.
    MethodNotFound = -32601,

    /// Invalid params (-32602)
    /// Invalid method parameter(s), including words rejected by validation.
    InvalidParams = -32602,

    /// Internal error (-32603)
    /// Internal JSON-RPC error.
    InternalError = -32603,

    /// Server error (-32000)
    /// The word store failed; the client may retry.
    ServerError = -32000,
}

impl ErrorCode {
    /// Returns a string description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidRequest => "Invalid Request",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid params",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::ServerError => "Server error",
        }
    }

    /// Create an ErrorCode from a raw integer value.
    ///
    /// Returns None if the code is not one the server emits.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -32700 => Some(ErrorCode::ParseError),
            -32600 => Some(ErrorCode::InvalidRequest),
            -32601 => Some(ErrorCode::MethodNotFound),
            -32602 => Some(ErrorCode::InvalidParams),
            -32603 => Some(ErrorCode::InternalError),
            c if (-32099..=-32000).contains(&c) => Some(ErrorCode::ServerError),
            _ => None,
        }
    }

    /// Returns the integer error code.
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

/// JSON-RPC error object as defined in the specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// The error code
    pub code: i32,

    /// A short description of the error
    pub message: String,

    /// Additional information about the error (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    /// Creates a new JSON-RPC error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
        }
    }

    /// Creates a new JSON-RPC error with additional data.
    pub fn with_data(code: ErrorCode, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Creates a standard parse error.
    pub fn parse_error() -> Self {
        Self::new(
            ErrorCode::ParseError,
            "Parse error: Invalid JSON was received",
        )
    }

    /// Creates a standard invalid request error.
    pub fn invalid_request<S: Into<String>>(msg: S) -> Self {
        Self::new(
            ErrorCode::InvalidRequest,
            format!("Invalid Request: {}", msg.into()),
        )
    }

    /// Creates a standard method not found error.
    pub fn method_not_found<S: Into<String>>(method: S) -> Self {
        Self::new(
            ErrorCode::MethodNotFound,
            format!("Method not found: {}", method.into()),
        )
    }

    /// Creates a standard invalid params error.
    pub fn invalid_params<S: Into<String>>(msg: S) -> Self {
        Self::new(
            ErrorCode::InvalidParams,
            format!("Invalid params: {}", msg.into()),
        )
    }

    /// Creates a standard internal error.
    pub fn internal_error<S: Into<String>>(msg: S) -> Self {
        Self::new(
            ErrorCode::InternalError,
            format!("Internal error: {}", msg.into()),
        )
    }
}

impl From<&WriteError> for JsonRpcError {
    /// Client mistakes map to `InvalidParams`, store failures to `ServerError`.
    /// The `data` member carries the `{ success, message, kind }` body clients
    /// show to users.
    fn from(err: &WriteError) -> Self {
        let code = if err.is_client_error() {
            ErrorCode::InvalidParams
        } else {
            ErrorCode::ServerError
        };
        let message = err.to_string();
        let data = json!({
            "success": false,
            "message": message,
            "kind": err.kind(),
        });
        Self::with_data(code, message, data)
    }
}

/// Error type for JSON-RPC envelope handling.
#[derive(Debug, Error)]
pub enum Error {
    /// The message was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON was valid but not a well-formed JSON-RPC request.
    #[error("JSON-RPC error: {0}")]
    JsonRpc(String),
}

impl Error {
    /// Converts the error to a JSON-RPC error.
    pub fn to_jsonrpc_error(&self) -> JsonRpcError {
        match self {
            Error::Json(_) => JsonRpcError::parse_error(),
            Error::JsonRpc(msg) => JsonRpcError::invalid_request(msg.as_str()),
        }
    }
}

/// Specialized Result type for JSON-RPC operations.
pub type Result<T> = std::result::Result<T, Error>;
