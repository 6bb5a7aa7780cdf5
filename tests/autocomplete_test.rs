//! Integration tests for the autocomplete server.
//! Drives a real file-backed server over TCP the way a client would.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

use makani_suggest_lib::config::limits::LimitsConfig;
use makani_suggest_lib::gateway::QueryGateway;
use makani_suggest_lib::protocol::jsonrpc::{create_handler, ServerState};
use makani_suggest_lib::seed::seed_words;
use makani_suggest_lib::store::{FileWordStore, WordStore};
use makani_suggest_lib::sync::IndexSynchronizer;
use makani_suggest_lib::transport::{SessionRegistry, TcpServer};
use makani_suggest_lib::word::DEFAULT_MAX_WORD_LENGTH;

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    next_id: i64,
}

impl Client {
    async fn connect(address: std::net::SocketAddr) -> Self {
        let (reader, writer) = TcpStream::connect(address).await.unwrap().into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
            next_id: 1,
        }
    }

    async fn send(&mut self, message: Value) {
        let mut line = message.to_string();
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let line = self.lines.next_line().await.unwrap().expect("connection closed");
        serde_json::from_str(&line).unwrap()
    }

    async fn call(&mut self, method: &str, params: Value) -> Value {
        let id = self.next_id;
        self.next_id += 1;
        self.send(json!({"jsonrpc": "2.0", "method": method, "params": params, "id": id}))
            .await;
        let response = self.recv().await;
        assert_eq!(response["id"], json!(id));
        response
    }
}

struct TestServer {
    address: std::net::SocketAddr,
    stop: oneshot::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

async fn start_server(state_dir: &std::path::Path) -> TestServer {
    let store: Arc<dyn WordStore> = Arc::new(FileWordStore::open(state_dir, false).await.unwrap());
    let synchronizer = IndexSynchronizer::bootstrap(store, DEFAULT_MAX_WORD_LENGTH).await.unwrap();
    let gateway = QueryGateway::new(synchronizer.index(), LimitsConfig::default());
    let sessions = SessionRegistry::new();
    let handler = create_handler(&ServerState {
        name: "integration".to_string(),
        synchronizer,
        gateway,
        sessions: Arc::clone(&sessions),
    });

    let server = TcpServer::bind("127.0.0.1:0".parse().unwrap(), handler, sessions, 16, 64 * 1024)
        .await
        .unwrap();
    let address = server.local_addr().unwrap();
    let (stop, stop_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        server
            .run_until(async {
                let _ = stop_rx.await;
            })
            .await
            .unwrap();
    });

    TestServer { address, stop, task }
}

impl TestServer {
    async fn shutdown(self) {
        let _ = self.stop.send(());
        self.task.await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_add_and_suggest_over_tcp() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server(dir.path()).await;
    let mut client = Client::connect(server.address).await;

    for word in ["apple", "app", "apply", "bat", "ball"] {
        let response = client.call("add_word", json!({"text": word})).await;
        assert_eq!(response["result"]["success"], json!(true));
    }

    let response = client.call("suggest", json!({"prefix": "ap"})).await;
    assert_eq!(
        response["result"],
        json!({"prefix": "ap", "suggestions": ["app", "apple", "apply"]})
    );

    let response = client.call("suggest", json!({"prefix": "cat"})).await;
    assert_eq!(response["result"]["suggestions"], json!([]));

    let response = client.call("add_word", json!({"text": ""})).await;
    assert_eq!(response["error"]["data"]["message"], json!("Please enter text"));

    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_prefix_subscription_streams_suggestions() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server(dir.path()).await;
    let mut client = Client::connect(server.address).await;
    client.call("add_word", json!({"text": "zebra"})).await;

    for prefix in ["z", "ze", "zeb", "zx"] {
        client
            .send(json!({"jsonrpc": "2.0", "method": "prefix", "params": {"prefix": prefix}}))
            .await;
    }

    let mut pushed = Vec::new();
    for _ in 0..4 {
        let event = client.recv().await;
        assert_eq!(event["method"], json!("suggestions"));
        assert!(event.get("id").is_none());
        pushed.push(event["params"]["suggestions"].clone());
    }
    assert_eq!(pushed, vec![json!(["zebra"]), json!(["zebra"]), json!(["zebra"]), json!([])]);

    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_write_visible_to_other_connections() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server(dir.path()).await;
    let mut writer = Client::connect(server.address).await;
    let mut reader = Client::connect(server.address).await;

    writer.call("add_word", json!({"text": "Kiwi"})).await;

    let response = reader.call("suggest", json!({"prefix": "KI"})).await;
    assert_eq!(response["result"]["suggestions"], json!(["kiwi"]));

    let status = reader.call("status", json!({})).await;
    assert_eq!(status["result"]["words"], json!(1));
    assert_eq!(status["result"]["connections"], json!(2));

    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_restart_recovers_words() {
    let dir = tempfile::tempdir().unwrap();

    let server = start_server(dir.path()).await;
    {
        let mut client = Client::connect(server.address).await;
        client.call("add_word", json!({"text": "persist"})).await;
        client.call("add_word", json!({"text": "persist"})).await;
    }
    server.shutdown().await;

    let store = FileWordStore::open(dir.path(), false).await.unwrap();
    seed_words(&store, "perch\npersist\n", 10, DEFAULT_MAX_WORD_LENGTH)
        .await
        .unwrap();
    drop(store);

    let server = start_server(dir.path()).await;
    let mut client = Client::connect(server.address).await;
    let response = client.call("suggest", json!({"prefix": "per"})).await;
    assert_eq!(response["result"]["suggestions"], json!(["perch", "persist"]));

    server.shutdown().await;
}
