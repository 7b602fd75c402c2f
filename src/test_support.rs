//! In-process JSON-RPC node for exercising the HTTP client

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Handler result: `Ok(result)` or `Err(error object)`
pub type RpcResult = Result<Value, Value>;

/// 32-byte big-endian word as 64 hex characters
pub fn word(value: u64) -> String {
    format!("{:064x}", value)
}

/// Serve JSON-RPC over HTTP on an ephemeral port and return its URL
pub async fn spawn_node<F>(handler: F) -> String
where
    F: Fn(&str, &Value) -> RpcResult + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let handler = handler.clone();
            tokio::spawn(async move {
                serve_one(socket, handler.as_ref()).await;
            });
        }
    });

    format!("http://{}", addr)
}

fn header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

async fn serve_one<F>(mut socket: TcpStream, handler: &F)
where
    F: Fn(&str, &Value) -> RpcResult,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let body = loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        if let Some(pos) = header_end(&buf) {
            let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
            let len = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            let start = pos + 4;
            if buf.len() >= start + len {
                break buf[start..start + len].to_vec();
            }
        }
    };

    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let response = match handler(&method, &request["params"]) {
        Ok(result) => json!({"jsonrpc": "2.0", "id": request["id"], "result": result}),
        Err(error) => json!({"jsonrpc": "2.0", "id": request["id"], "error": error}),
    }
    .to_string();

    let http = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.len(),
        response
    );
    let _ = socket.write_all(http.as_bytes()).await;
    let _ = socket.shutdown().await;
}
