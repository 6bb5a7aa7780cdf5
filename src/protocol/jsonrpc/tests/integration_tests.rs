// Copyright (c) 2026 Makani Suggest Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Integration tests for the JSON-RPC 2.0 handler.
//!
//! These run the registered autocomplete methods against a real synchronizer
//! and gateway, driven through raw message strings.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::limits::LimitsConfig;
use crate::gateway::QueryGateway;
use crate::protocol::jsonrpc::{
    create_handler, ErrorCode, Id, JsonRpcHandler, MethodContext, Notification, Request, Response,
    ServerState,
};
use crate::store::{MemoryWordStore, WordStore};
use crate::sync::IndexSynchronizer;
use crate::transport::session::SessionRegistry;

struct Harness {
    store: Arc<MemoryWordStore>,
    handler: JsonRpcHandler,
}

impl Harness {
    async fn new() -> Self {
        let store = Arc::new(MemoryWordStore::new());
        let synchronizer = IndexSynchronizer::bootstrap_default(store.clone()).await.unwrap();
        let gateway = QueryGateway::new(synchronizer.index(), LimitsConfig::default());
        let handler = create_handler(&ServerState {
            name: "integration".to_string(),
            synchronizer,
            gateway,
            sessions: SessionRegistry::new(),
        });
        Self { store, handler }
    }

    async fn call(&self, method: &str, params: Value, id: i64) -> Response {
        let request = Request::with_number_id(method, Some(params), id);
        let lines = self
            .handler
            .handle_message(&serde_json::to_string(&request).unwrap(), MethodContext::for_session(1))
            .await;
        assert_eq!(lines.len(), 1);
        serde_json::from_str(&lines[0]).unwrap()
    }

    async fn add(&self, word: &str) -> Response {
        self.call("add_word", json!({"text": word}), 0).await
    }

    async fn suggest(&self, prefix: &str) -> Vec<String> {
        let response = self.call("suggest", json!({"prefix": prefix}), 0).await;
        serde_json::from_value(response.result.unwrap()["suggestions"].clone()).unwrap()
    }
}

#[tokio::test]
async fn test_basic_suggestions() {
    let harness = Harness::new().await;
    for word in ["apple", "app", "apply", "bat", "ball"] {
        assert!(harness.add(word).await.is_success());
    }

    assert_eq!(harness.suggest("ap").await, vec!["app", "apple", "apply"]);
    assert_eq!(harness.suggest("ba").await, vec!["ball", "bat"]);
    assert!(harness.suggest("cat").await.is_empty());
}

#[tokio::test]
async fn test_duplicate_add_keeps_single_copy() {
    let harness = Harness::new().await;

    let first = harness.add("apple").await.result.unwrap();
    let second = harness.add("Apple").await.result.unwrap();

    assert_eq!(first["inserted"], json!(true));
    assert_eq!(second["inserted"], json!(false));
    assert_eq!(second["message"], json!("Word added successfully"));
    assert_eq!(harness.suggest("app").await, vec!["apple"]);
    assert_eq!(harness.store.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_empty_text_is_rejected_with_message() {
    let harness = Harness::new().await;

    let response = harness.add("").await;
    let error = response.error.unwrap();

    assert_eq!(error.code, ErrorCode::InvalidParams.code());
    assert_eq!(error.data.unwrap()["message"], json!("Please enter text"));
    assert!(harness.suggest("").await.is_empty());
}

#[tokio::test]
async fn test_store_outage_leaves_index_clean() {
    let harness = Harness::new().await;
    harness.store.set_available(false);

    let response = harness.add("zebra").await;
    let error = response.error.unwrap();
    assert_eq!(error.code, ErrorCode::ServerError.code());
    assert_eq!(error.data.unwrap()["success"], json!(false));
    assert!(harness.suggest("ze").await.is_empty());

    harness.store.set_available(true);
    assert!(harness.add("zebra").await.is_success());
    assert_eq!(harness.suggest("ze").await, vec!["zebra"]);
}

#[tokio::test]
async fn test_prefix_notification_pushes_suggestions() {
    let harness = Harness::new().await;
    harness.add("apple").await;

    let message = serde_json::to_string(&Notification::notification("prefix", Some(json!({"prefix": "a"}))))
        .unwrap();
    let lines = harness.handler.handle_message(&message, MethodContext::for_session(1)).await;

    assert_eq!(lines.len(), 1);
    let event: Notification = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(event.method, "suggestions");
    assert_eq!(event.params, Some(json!({"prefix": "a", "suggestions": ["apple"]})));
}

#[tokio::test]
async fn test_mixed_batch_requests() {
    let harness = Harness::new().await;
    harness.add("apple").await;

    let batch = json!([
        {"jsonrpc": "2.0", "method": "suggest", "params": {"prefix": "a"}, "id": "q"},
        {"jsonrpc": "2.0", "method": "prefix", "params": {"prefix": "ap"}},
        {"jsonrpc": "2.0", "method": "status", "id": "s"},
        {"jsonrpc": "2.0", "method": "frobnicate", "id": "x"}
    ]);
    let lines = harness
        .handler
        .handle_message(&batch.to_string(), MethodContext::for_session(1))
        .await;

    assert_eq!(lines.len(), 2);
    let responses: Vec<Response> = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0].id, Id::String("q".to_string()));
    assert_eq!(responses[1].result.as_ref().unwrap()["words"], json!(1));
    assert_eq!(
        responses[2].error.as_ref().unwrap().code,
        ErrorCode::MethodNotFound.code()
    );

    let event: Notification = serde_json::from_str(&lines[1]).unwrap();
    assert_eq!(event.params.unwrap()["suggestions"], json!(["apple"]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_all_visible() {
    let harness = Arc::new(Harness::new().await);

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let harness = Arc::clone(&harness);
            tokio::spawn(async move { harness.add(&format!("word{i:02}")).await })
        })
        .collect();

    for response in futures::future::join_all(tasks).await {
        assert!(response.unwrap().is_success());
    }

    let response = harness.call("suggest", json!({"prefix": "word", "limit": 100}), 1).await;
    let suggestions = response.result.unwrap()["suggestions"].as_array().unwrap().len();
    assert_eq!(suggestions, 32);
}
