//! One-shot HTTP server answering a single request with a canned reply.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// A request as the server saw it.
pub struct Received {
    pub head: String,
    pub body: String,
}

/// Bind 127.0.0.1 on a free port and answer the first request with `status`
/// and the JSON `body`. Returns the base URL and the captured request.
pub async fn serve_once(status: &str, body: &str) -> anyhow::Result<(String, oneshot::Receiver<Received>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let response = format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else { return };
        if let Ok(request) = read_request(&mut socket).await {
            let _ = tx.send(request);
        }
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });
    Ok((format!("http://{addr}"), rx))
}

async fn read_request(socket: &mut TcpStream) -> std::io::Result<Received> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await?;
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_string();
            let len = head
                .lines()
                .find_map(|l| l.to_ascii_lowercase().strip_prefix("content-length:").map(|v| v.trim().to_string()))
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(0);
            if n == 0 || buf.len() >= end + 4 + len {
                let body = String::from_utf8_lossy(&buf[end + 4..]).to_string();
                return Ok(Received { head, body });
            }
        } else if n == 0 {
            return Ok(Received { head: String::from_utf8_lossy(&buf).to_string(), body: String::new() });
        }
    }
}
