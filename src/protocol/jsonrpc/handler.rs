// Copyright (c) 2026 Makani Suggest Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! JSON-RPC 2.0 handler implementation.
//!
//! This module provides the core handler for JSON-RPC 2.0 messages, supporting
//! method registration, request dispatching, and asynchronous execution.
//!
//! Two kinds of methods can be registered:
//! - plain methods answer requests that carry an `id`; notifications to them
//!   are executed and produce nothing;
//! - subscription methods additionally answer notifications by emitting one
//!   notification of their event type carrying the method's result.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::error::JsonRpcError;
use super::types::{Id, Notification, Request, Response};
use super::validation::{validate_request, ValidatedRequest};

/// Fallback line used if a response cannot be serialized.
const SERIALIZATION_FAILURE: &str =
    r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error: Error serializing response"},"id":null}"#;

/// A method handler context containing additional information about the request.
#[derive(Debug, Clone, Default)]
pub struct MethodContext {
    /// Identifier of the connection the message arrived on
    pub session: Option<u64>,
}

impl MethodContext {
    /// Creates a context for the given session.
    pub fn for_session(session: u64) -> Self {
        Self {
            session: Some(session),
        }
    }
}

/// Type alias for method handler response.
pub type MethodResult = std::result::Result<Value, JsonRpcError>;

/// Type alias for method handler's future return type.
pub type MethodHandlerFuture = BoxFuture<'static, MethodResult>;

/// Type alias for shared method handlers.
pub type MethodHandlerFn = Arc<dyn MethodHandler + Send + Sync>;

/// Trait for method handlers to implement.
pub trait MethodHandler {
    /// Handle a method call asynchronously.
    ///
    /// # Parameters
    /// * `params` - The parameters passed to the method.
    /// * `context` - Additional context for the method call.
    fn handle(&self, params: Option<Value>, context: MethodContext) -> MethodHandlerFuture;
}

impl<F, Fut> MethodHandler for F
where
    F: Send + Sync + 'static + Fn(Option<Value>, MethodContext) -> Fut,
    Fut: Future<Output = MethodResult> + Send + 'static,
{
    fn handle(&self, params: Option<Value>, context: MethodContext) -> MethodHandlerFuture {
        Box::pin((self)(params, context))
    }
}

#[derive(Clone)]
struct RegisteredMethod {
    handler: MethodHandlerFn,
    /// Event emitted when the method is invoked as a notification
    event: Option<String>,
}

/// A message produced by dispatching one request.
#[derive(Debug, Clone)]
pub enum Outbound {
    /// Reply to a request with an id
    Response(Response),
    /// Event pushed in answer to a subscription notification
    Event(Notification),
}

/// Handler for JSON-RPC 2.0 messages.
///
/// This struct is responsible for:
/// - Registering method handlers
/// - Validating incoming messages
/// - Dispatching requests to appropriate handlers
/// - Collecting and formatting responses and events
///
/// Cloning is cheap; clones share the method table.
#[derive(Clone, Default)]
pub struct JsonRpcHandler {
    methods: Arc<RwLock<HashMap<String, RegisteredMethod>>>,
}

impl std::fmt::Debug for JsonRpcHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self.methods.read().keys().cloned().collect();
        names.sort();
        f.debug_struct("JsonRpcHandler")
            .field("methods", &names)
            .finish()
    }
}

impl JsonRpcHandler {
    /// Creates a new JSON-RPC handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a method handler function.
    pub fn register_method<F, Fut>(&mut self, method: impl Into<String>, handler: F)
    where
        F: Send + Sync + 'static + Fn(Option<Value>, MethodContext) -> Fut,
        Fut: Future<Output = MethodResult> + Send + 'static,
    {
        self.insert(method.into(), Arc::new(handler), None);
    }

    /// Registers an already boxed handler.
    pub fn register_handler(&mut self, method: impl Into<String>, handler: MethodHandlerFn) {
        self.insert(method.into(), handler, None);
    }

    /// Registers a subscription method.
    ///
    /// Requests with an id get a normal response. Notifications get exactly one
    /// `event` notification whose params are the handler's result.
    pub fn register_subscription<F, Fut>(
        &mut self,
        method: impl Into<String>,
        event: impl Into<String>,
        handler: F,
    ) where
        F: Send + Sync + 'static + Fn(Option<Value>, MethodContext) -> Fut,
        Fut: Future<Output = MethodResult> + Send + 'static,
    {
        self.insert(method.into(), Arc::new(handler), Some(event.into()));
    }

    fn insert(&mut self, method: String, handler: MethodHandlerFn, event: Option<String>) {
        self.methods
            .write()
            .insert(method, RegisteredMethod { handler, event });
    }

    /// Returns the names of all registered methods, sorted.
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Handles one raw message (a single request or a batch).
    ///
    /// Returns the serialized lines to send back, in order: at most one
    /// response (or response array for batches) followed by any subscription
    /// events. Pure notifications yield no lines.
    pub async fn handle_message(&self, message: &str, context: MethodContext) -> Vec<String> {
        let validated = match validate_request(message) {
            Ok(req) => req,
            Err(err) => {
                debug!(error = %err, "Rejected malformed message");
                return vec![encode(&Response::error(Id::Null, err.to_jsonrpc_error()))];
            }
        };

        match validated {
            ValidatedRequest::Single(request) => self
                .dispatch(request, context)
                .await
                .map(|outbound| match outbound {
                    Outbound::Response(response) => encode(&response),
                    Outbound::Event(event) => encode(&event),
                })
                .into_iter()
                .collect(),
            ValidatedRequest::Batch(batch) => {
                let futures = batch
                    .requests
                    .into_iter()
                    .map(|request| self.dispatch(request, context.clone()));

                let mut responses = Vec::new();
                let mut events = Vec::new();
                for outbound in join_all(futures).await.into_iter().flatten() {
                    match outbound {
                        Outbound::Response(response) => responses.push(response),
                        Outbound::Event(event) => events.push(event),
                    }
                }

                let mut lines = Vec::with_capacity(events.len() + 1);
                if !responses.is_empty() {
                    lines.push(encode(&responses));
                }
                lines.extend(events.iter().map(encode));
                lines
            }
        }
    }

    /// Dispatches a single validated request to its handler.
    pub async fn dispatch(&self, request: Request, context: MethodContext) -> Option<Outbound> {
        let registered = self.methods.read().get(&request.method).cloned();

        let Some(registered) = registered else {
            return match request.id {
                Some(id) => Some(Outbound::Response(Response::error(
                    id,
                    JsonRpcError::method_not_found(&request.method),
                ))),
                None => {
                    debug!(method = %request.method, "Notification for unknown method dropped");
                    None
                }
            };
        };

        let result = registered.handler.handle(request.params, context).await;

        match (request.id, registered.event) {
            (Some(id), _) => Some(Outbound::Response(match result {
                Ok(value) => Response::success(id, value),
                Err(error) => Response::error(id, error),
            })),
            (None, Some(event)) => match result {
                Ok(value) => Some(Outbound::Event(Notification::notification(event, Some(value)))),
                Err(error) => {
                    debug!(method = %request.method, error = ?error, "Subscription request failed");
                    None
                }
            },
            (None, None) => {
                if let Err(error) = result {
                    debug!(method = %request.method, error = ?error, "Notification failed");
                }
                None
            }
        }
    }
}

fn encode<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| SERIALIZATION_FAILURE.to_string())
}
