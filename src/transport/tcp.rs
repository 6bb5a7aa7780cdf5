//! TCP transport.
//!
//! Each accepted connection is served on its own task. A semaphore bounds the
//! number of open connections; further clients wait in the listen backlog.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn, Instrument};

use super::serve_connection;
use super::session::SessionRegistry;
use crate::error::{report_error, ErrorContext, TransportError, TransportResult};
use crate::protocol::jsonrpc::{JsonRpcHandler, MethodContext};

/// A bound TCP listener serving JSON-RPC lines.
#[derive(Debug)]
pub struct TcpServer {
    listener: TcpListener,
    handler: JsonRpcHandler,
    sessions: Arc<SessionRegistry>,
    connection_limit: Arc<Semaphore>,
    max_message_size: usize,
}

impl TcpServer {
    /// Binds `address`. Port 0 picks a free port; see [`TcpServer::local_addr`].
    pub async fn bind(
        address: SocketAddr,
        handler: JsonRpcHandler,
        sessions: Arc<SessionRegistry>,
        max_connections: usize,
        max_message_size: usize,
    ) -> TransportResult<Self> {
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| TransportError::Bind { address, source })?;

        Ok(Self {
            listener,
            handler,
            sessions,
            connection_limit: Arc::new(Semaphore::new(max_connections)),
            max_message_size,
        })
    }

    /// The address the listener is bound to.
    pub fn local_addr(&self) -> TransportResult<SocketAddr> {
        self.listener.local_addr().map_err(TransportError::Accept)
    }

    /// Accepts connections until `shutdown` resolves.
    ///
    /// Connections already open keep running on their own tasks.
    pub async fn run_until<F>(self, shutdown: F) -> TransportResult<()>
    where
        F: Future<Output = ()>,
    {
        info!(address = %self.local_addr()?, "Listening for TCP connections");
        tokio::pin!(shutdown);

        loop {
            let permit = tokio::select! {
                _ = &mut shutdown => break,
                permit = Arc::clone(&self.connection_limit).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let (stream, peer) = tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        // Usually transient (EMFILE, aborted handshake)
                        warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                },
            };

            let handler = self.handler.clone();
            let sessions = Arc::clone(&self.sessions);
            let max_message_size = self.max_message_size;
            tokio::spawn(async move {
                let _permit = permit;
                handle_stream(stream, peer, handler, sessions, max_message_size).await;
            });
        }

        info!("TCP listener stopped");
        Ok(())
    }
}

async fn handle_stream(
    stream: TcpStream,
    peer: SocketAddr,
    handler: JsonRpcHandler,
    sessions: Arc<SessionRegistry>,
    max_message_size: usize,
) {
    if let Err(e) = stream.set_nodelay(true) {
        debug!(%peer, error = %e, "Could not set TCP_NODELAY");
    }

    let session = sessions.open(Some(peer));
    let span = tracing::info_span!("connection", session = session.id(), %peer);
    let context = MethodContext::for_session(session.id());
    let (reader, writer) = stream.into_split();

    async move {
        debug!("Connection accepted");
        match serve_connection(reader, writer, &handler, max_message_size, context).await {
            Ok(()) => debug!("Connection closed by peer"),
            Err(e) => {
                error!(error = %e, "Connection failed");
                report_error(
                    ErrorContext::new(&e, "tcp_transport").with_details(format!("peer {peer}")),
                );
            }
        }
        drop(session);
    }
    .instrument(span)
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::jsonrpc::Response;
    use serde_json::{json, Value};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_tcp_roundtrip_and_shutdown() {
        let mut handler = JsonRpcHandler::new();
        handler.register_method("echo", |params, _| async move { Ok(params.unwrap_or(Value::Null)) });
        let sessions = SessionRegistry::new();

        let server = TcpServer::bind(
            "127.0.0.1:0".parse().unwrap(),
            handler,
            Arc::clone(&sessions),
            4,
            1024,
        )
        .await
        .unwrap();
        let address = server.local_addr().unwrap();

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server_task = tokio::spawn(server.run_until(async {
            let _ = stop_rx.await;
        }));

        let stream = TcpStream::connect(address).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        writer
            .write_all(b"{\"jsonrpc\":\"2.0\",\"method\":\"echo\",\"params\":[\"hi\"],\"id\":1}\n")
            .await
            .unwrap();

        let mut lines = BufReader::new(reader).lines();
        let line = lines.next_line().await.unwrap().unwrap();
        let response: Response = serde_json::from_str(&line).unwrap();
        assert_eq!(response.result, Some(json!(["hi"])));
        assert_eq!(sessions.len(), 1);

        drop(writer);
        assert!(lines.next_line().await.unwrap().is_none());

        stop_tx.send(()).unwrap();
        server_task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_bind_failure_reports_address() {
        let first = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let taken = first.local_addr().unwrap();

        let err = TcpServer::bind(taken, JsonRpcHandler::new(), SessionRegistry::new(), 1, 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Bind { address, .. } if address == taken));
    }
}
