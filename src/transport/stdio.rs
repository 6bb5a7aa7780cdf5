//! Standard input/output transport.
//!
//! Serves a single client over the process's stdin and stdout. Logs must go
//! to stderr when this transport is active.

use std::sync::Arc;

use tracing::info;

use super::serve_connection;
use super::session::SessionRegistry;
use crate::error::TransportResult;
use crate::protocol::jsonrpc::{JsonRpcHandler, MethodContext};

/// Serves JSON-RPC lines on stdin/stdout until stdin closes.
pub async fn serve_stdio(
    handler: &JsonRpcHandler,
    sessions: &Arc<SessionRegistry>,
    max_message_size: usize,
) -> TransportResult<()> {
    let session = sessions.open(None);
    info!(session = session.id(), "Serving on stdio");

    let result = serve_connection(
        tokio::io::stdin(),
        tokio::io::stdout(),
        handler,
        max_message_size,
        MethodContext::for_session(session.id()),
    )
    .await;

    info!(session = session.id(), "Stdin closed");
    result
}
