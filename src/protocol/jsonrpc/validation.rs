// Copyright (c) 2026 Makani Suggest Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Request validation utilities for the JSON-RPC 2.0 handler.
//!
//! This module provides functions to validate JSON-RPC requests according to the specification.
//! It includes checks for protocol version, required fields, and data type validation.

use super::error::{Error, Result};
use super::types::{BatchRequest, Request, JSONRPC_VERSION};
use serde_json::Value;

/// Validates a JSON-RPC 2.0 request string.
///
/// Performs the following checks:
/// - Verifies the JSON is valid
/// - Checks if it's a single request or batch
/// - For each request, validates required fields and format
///
/// Returns an error if validation fails, otherwise returns the parsed request(s).
pub fn validate_request<T: AsRef<str>>(request_str: T) -> Result<ValidatedRequest> {
    let json: Value = serde_json::from_str(request_str.as_ref())?;

    match json {
        Value::Array(ref arr) => {
            if arr.is_empty() {
                return Err(Error::JsonRpc("Empty batch requests are invalid".to_string()));
            }

            let batch: BatchRequest = serde_json::from_value(json)
                .map_err(|e| Error::JsonRpc(format!("Malformed batch entry: {e}")))?;

            for request in &batch.requests {
                validate_single_request(request)?;
            }

            Ok(ValidatedRequest::Batch(batch))
        }
        Value::Object(_) => {
            let request: Request = serde_json::from_value(json)
                .map_err(|e| Error::JsonRpc(format!("Malformed request: {e}")))?;

            validate_single_request(&request)?;

            Ok(ValidatedRequest::Single(request))
        }
        _ => Err(Error::JsonRpc(
            "Invalid JSON-RPC request, must be an object or array".to_string(),
        )),
    }
}

/// Validates a single JSON-RPC 2.0 request object.
///
/// Performs the following checks:
/// - Verifies the jsonrpc version is "2.0"
/// - Checks that method is a non-empty string
/// - Validates that params, if present, is either an object or array
fn validate_single_request(request: &Request) -> Result<()> {
    if request.jsonrpc != JSONRPC_VERSION {
        return Err(Error::JsonRpc(format!(
            "Invalid JSON-RPC version: {}, must be 2.0",
            request.jsonrpc
        )));
    }

    if request.method.is_empty() {
        return Err(Error::JsonRpc("Method cannot be empty".to_string()));
    }

    if let Some(ref params) = request.params {
        if !params.is_object() && !params.is_array() && !params.is_null() {
            return Err(Error::JsonRpc(
                "Params must be an object, array, or null".to_string(),
            ));
        }
    }

    Ok(())
}

/// The result of validating a JSON-RPC request.
///
/// Can be either a single request or a batch of requests.
#[derive(Debug, Clone)]
pub enum ValidatedRequest {
    /// A single, validated JSON-RPC request
    Single(Request),

    /// A batch of validated JSON-RPC requests
    Batch(BatchRequest),
}

impl ValidatedRequest {
    /// Returns true if this is a batch request
    pub fn is_batch(&self) -> bool {
        matches!(self, ValidatedRequest::Batch(_))
    }

    /// Returns the contained single request if this is a single request
    pub fn as_single(&self) -> Option<&Request> {
        match self {
            ValidatedRequest::Single(req) => Some(req),
            _ => None,
        }
    }
}
