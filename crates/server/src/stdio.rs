//! Newline-delimited MCP over a pair of byte streams.
//!
//! rmcp's line transport ends the session at the first line it cannot
//! decode, so input is screened before it reaches the session. Lines that
//! are not client JSON-RPC messages are answered here with a JSON-RPC error
//! and the session keeps running.

use anyhow::{Context, Result};
use rmcp::model::{ClientJsonRpcMessage, ErrorData};
use rmcp::ServiceExt;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, watch};
use tooling::AccountTools;
use tracing::{debug, info, warn};

const PIPE_CAPACITY: usize = 64 * 1024;

/// Ids of forwarded requests that have not been answered yet.
type Pending = Arc<watch::Sender<HashSet<String>>>;

#[derive(Debug, PartialEq)]
enum Screened {
    Forward,
    Reply(Value),
    Ignore,
}

fn screen(line: &[u8]) -> Screened {
    let value: Value = match serde_json::from_slice(line) {
        Ok(value) => value,
        Err(e) => {
            return Screened::Reply(error_reply(
                Value::Null,
                ErrorData::parse_error(e.to_string(), None),
            ))
        }
    };

    if serde_json::from_value::<ClientJsonRpcMessage>(value.clone()).is_ok() {
        return Screened::Forward;
    }

    if !value.is_object() {
        return Screened::Reply(error_reply(
            Value::Null,
            ErrorData::invalid_request("Message must be a JSON object", None),
        ));
    }

    let is_response =
        value.get("method").is_none() && (value.get("result").is_some() || value.get("error").is_some());
    match value.get("id") {
        Some(id) if !is_response => Screened::Reply(error_reply(
            id.clone(),
            ErrorData::invalid_request("Not a valid JSON-RPC request", None),
        )),
        _ => Screened::Ignore,
    }
}

fn error_reply(id: Value, error: ErrorData) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "error": error})
}

fn encode_line(value: &Value) -> Vec<u8> {
    let mut line = value.to_string().into_bytes();
    line.push(b'\n');
    line
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Request id of a client message, as a lookup key.
fn request_key(line: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(line).ok()?;
    value.get("method")?;
    value.get("id").map(Value::to_string)
}

/// Id of a response written by the session, as a lookup key.
fn response_key(line: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(line).ok()?;
    if value.get("method").is_some() {
        return None;
    }
    value.get("id").map(Value::to_string)
}

async fn screen_input<R, W>(
    reader: R,
    mut session_input: W,
    replies: mpsc::UnboundedSender<Vec<u8>>,
    pending: Pending,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .context("Failed to read from input")?;
        if read == 0 {
            break;
        }

        let line = trim_line_end(&buf);
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match screen(line) {
            Screened::Forward => {
                if let Some(key) = request_key(line) {
                    pending.send_modify(|ids| {
                        ids.insert(key);
                    });
                }
                session_input
                    .write_all(line)
                    .await
                    .context("Failed to forward message")?;
                session_input
                    .write_all(b"\n")
                    .await
                    .context("Failed to forward message")?;
            }
            Screened::Reply(reply) => {
                warn!(code = %reply["error"]["code"], "Rejected input line");
                let _ = replies.send(encode_line(&reply));
            }
            Screened::Ignore => debug!("Dropped undecodable message without id"),
        }
    }

    // Closing the session input ends the session, so answer what is in flight first.
    let mut outstanding = pending.subscribe();
    let _ = outstanding.wait_for(HashSet::is_empty).await;

    debug!("Input closed");
    session_input
        .shutdown()
        .await
        .context("Failed to close session input")?;
    Ok(())
}

async fn collect_output<R>(
    session_output: R,
    replies: mpsc::UnboundedSender<Vec<u8>>,
    pending: Pending,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(session_output);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .context("Failed to read session output")?;
        if read == 0 {
            break;
        }

        if let Some(key) = response_key(trim_line_end(&buf)) {
            pending.send_modify(|ids| {
                ids.remove(&key);
            });
        }
        let _ = replies.send(buf.clone());
    }

    // Nothing else will be answered once the session is gone.
    pending.send_modify(HashSet::clear);
    Ok(())
}

async fn write_output<W>(mut lines: mpsc::UnboundedReceiver<Vec<u8>>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = lines.recv().await {
        writer
            .write_all(&line)
            .await
            .context("Failed to write response")?;
        writer.flush().await.context("Failed to flush output")?;
    }
    Ok(())
}

/// Serves one MCP session until `reader` reaches end of input.
pub async fn serve<R, W>(tools: AccountTools, reader: R, writer: W) -> Result<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (session_end, pipe_end) = tokio::io::duplex(PIPE_CAPACITY);
    let (pipe_read, pipe_write) = tokio::io::split(pipe_end);
    let (tx, rx) = mpsc::unbounded_channel();
    let (pending, _) = watch::channel(HashSet::new());
    let pending = Arc::new(pending);

    let screening = tokio::spawn(screen_input(reader, pipe_write, tx.clone(), pending.clone()));
    let collecting = tokio::spawn(collect_output(pipe_read, tx, pending));
    let writing = tokio::spawn(write_output(rx, writer));

    let session = tools
        .serve(tokio::io::split(session_end))
        .await
        .context("MCP session failed to initialize")?;
    let reason = session.waiting().await.context("MCP session task failed")?;
    debug!(?reason, "MCP session ended");

    screening.await.context("Input task failed")??;
    collecting.await.context("Output task failed")??;
    writing.await.context("Writer task failed")??;
    Ok(())
}

pub async fn serve_stdio(tools: AccountTools) -> Result<()> {
    info!("Serving MCP over stdio");
    serve(tools, tokio::io::stdin(), tokio::io::stdout()).await
}
