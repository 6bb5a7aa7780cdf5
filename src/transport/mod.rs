//! Line-oriented transports.
//!
//! Every transport speaks newline-delimited JSON-RPC: one message per line in
//! each direction. A connection's lines are handled strictly in order, so a
//! query sent after an `add_word` on the same connection always sees the word.

pub mod session;
pub mod stdio;
pub mod tcp;

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tracing::{trace, warn};

use crate::error::{TransportError, TransportResult};
use crate::protocol::jsonrpc::{Id, JsonRpcError, JsonRpcHandler, MethodContext, Response};

pub use session::{SessionGuard, SessionInfo, SessionRegistry};
pub use stdio::serve_stdio;
pub use tcp::TcpServer;

/// Reads messages from `reader` until EOF and writes replies to `writer`.
///
/// Blank lines are skipped. A line longer than `max_message_size` bytes is
/// discarded and answered with an invalid-request error; the connection
/// stays open.
pub async fn serve_connection<R, W>(
    reader: R,
    mut writer: W,
    handler: &JsonRpcHandler,
    max_message_size: usize,
    context: MethodContext,
) -> TransportResult<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::with_capacity(1024);
    let read_limit = max_message_size as u64 + 1;

    loop {
        buf.clear();
        let read = (&mut reader)
            .take(read_limit)
            .read_until(b'\n', &mut buf)
            .await
            .map_err(TransportError::Read)?;
        if read == 0 {
            break;
        }

        if buf.last() != Some(&b'\n') && buf.len() > max_message_size {
            discard_line(&mut reader).await.map_err(TransportError::Read)?;
            let err = TransportError::MessageTooLarge {
                size: buf.len(),
                limit: max_message_size,
            };
            warn!(session = ?context.session, error = %err, "Dropping oversized message");
            let response =
                Response::error(Id::Null, JsonRpcError::invalid_request(err.to_string()));
            write_line(&mut writer, &encode_response(&response)).await?;
            writer.flush().await.map_err(TransportError::Write)?;
            continue;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(_) => {
                let response = Response::error(Id::Null, JsonRpcError::parse_error());
                write_line(&mut writer, &encode_response(&response)).await?;
                writer.flush().await.map_err(TransportError::Write)?;
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        trace!(session = ?context.session, bytes = line.len(), "Message received");
        let replies = handler.handle_message(line, context.clone()).await;
        for reply in &replies {
            write_line(&mut writer, reply).await?;
        }
        if !replies.is_empty() {
            writer.flush().await.map_err(TransportError::Write)?;
        }
    }

    writer.flush().await.map_err(TransportError::Write)
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> TransportResult<()> {
    writer.write_all(line.as_bytes()).await.map_err(TransportError::Write)?;
    writer.write_all(b"\n").await.map_err(TransportError::Write)
}

/// Skips input up to and including the next newline.
async fn discard_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let (consumed, done) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|b| *b == b'\n') {
                Some(pos) => (pos + 1, true),
                None => (available.len(), false),
            }
        };
        reader.consume(consumed);
        if done {
            return Ok(());
        }
    }
}

fn encode_response(response: &Response) -> String {
    serde_json::to_string(response).unwrap_or_else(|_| {
        r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"},"id":null}"#.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::jsonrpc::Notification;
    use serde_json::{json, Value};
    use tokio::io::{duplex, AsyncBufReadExt};
    use tokio_test::assert_ok;

    fn echo_handler() -> JsonRpcHandler {
        let mut handler = JsonRpcHandler::new();
        handler.register_method("echo", |params, _| async move { Ok(params.unwrap_or(Value::Null)) });
        handler.register_subscription("watch", "watched", |params, _| async move {
            Ok(params.unwrap_or(Value::Null))
        });
        handler
    }

    async fn exchange(input: &[u8], max_message_size: usize) -> Vec<String> {
        let handler = echo_handler();
        let (client, server) = duplex(64 * 1024);
        let (server_read, server_write) = tokio::io::split(server);
        let (client_read, mut client_write) = tokio::io::split(client);

        client_write.write_all(input).await.unwrap();
        client_write.shutdown().await.unwrap();

        let result = serve_connection(
            server_read,
            server_write,
            &handler,
            max_message_size,
            MethodContext::for_session(1),
        )
        .await;
        assert_ok!(result);

        let mut lines = Vec::new();
        let mut reader = BufReader::new(client_read).lines();
        // The server half is dropped once serve_connection returns
        while let Ok(Some(line)) = reader.next_line().await {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn test_replies_in_order_and_skips_blank_lines() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","method":"echo","params":[1],"id":1}"#,
            "\n\n   \n",
            r#"{"jsonrpc":"2.0","method":"echo","params":[2],"id":2}"#,
            "\r\n",
        );
        let lines = exchange(input.as_bytes(), 1024).await;

        assert_eq!(lines.len(), 2);
        let first: Response = serde_json::from_str(&lines[0]).unwrap();
        let second: Response = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(first.result, Some(json!([1])));
        assert_eq!(second.result, Some(json!([2])));
    }

    #[tokio::test]
    async fn test_subscription_pushes_event_line() {
        let input = format!(
            "{}\n",
            r#"{"jsonrpc":"2.0","method":"watch","params":{"prefix":"a"}}"#
        );
        let lines = exchange(input.as_bytes(), 1024).await;

        assert_eq!(lines.len(), 1);
        let event: Notification = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(event.method, "watched");
    }

    #[tokio::test]
    async fn test_oversized_line_is_rejected_and_connection_survives() {
        let mut input = vec![b'x'; 300];
        input.push(b'\n');
        input.extend_from_slice(br#"{"jsonrpc":"2.0","method":"echo","params":[3],"id":3}"#);
        input.push(b'\n');

        let lines = exchange(&input, 100).await;

        assert_eq!(lines.len(), 2);
        let rejected: Response = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(rejected.id, Id::Null);
        assert_eq!(rejected.error.unwrap().code, -32600);
        let ok: Response = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(ok.result, Some(json!([3])));
    }

    #[tokio::test]
    async fn test_garbage_gets_parse_error() {
        let lines = exchange(b"not json\n\xff\xfe\n", 1024).await;

        assert_eq!(lines.len(), 2);
        for line in lines {
            let response: Response = serde_json::from_str(&line).unwrap();
            assert_eq!(response.error.unwrap().code, -32700);
        }
    }

    #[tokio::test]
    async fn test_final_line_without_newline_is_handled() {
        let lines = exchange(br#"{"jsonrpc":"2.0","method":"echo","params":[4],"id":4}"#, 1024).await;
        assert_eq!(lines.len(), 1);
    }
}
