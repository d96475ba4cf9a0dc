#![allow(dead_code)]

use serde_json::Value as JsonValue;
use tokio::io::{ AsyncReadExt, AsyncWriteExt };
use tokio::net::{ TcpListener, TcpStream };
use tokio::task::JoinHandle;

/// A request as the fake webhook saw it.
pub struct CapturedRequest {
    pub head: String,
    pub body: String,
}

impl CapturedRequest {
    /// Header lookup, case-insensitive on the name.
    pub fn header(&self, name: &str) -> Option<String> {
        let wanted = format!("{}:", name.to_lowercase());
        self.head.lines().find_map(|line| {
            if line.to_lowercase().starts_with(&wanted) {
                Some(line[wanted.len()..].trim().to_string())
            } else {
                None
            }
        })
    }

    pub fn json(&self) -> JsonValue {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

/// Serves one canned response per connection, in order, then stops.
pub async fn spawn_webhook(
    responses: Vec<(u16, String)>
) -> (String, JoinHandle<Vec<CapturedRequest>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind local test server");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let mut captured = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.expect("accept connection");
            captured.push(read_request(&mut socket).await);

            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason(status),
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.expect("write response");
            let _ = socket.shutdown().await;
        }
        captured
    });

    (format!("http://{}/webhook/chat", addr), handle)
}

/// A URL nothing listens on.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}/webhook/chat", addr)
}

async fn read_request(socket: &mut TcpStream) -> CapturedRequest {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.expect("read request");
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(end) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&data[..end]).to_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= end + 4 + content_length {
                break;
            }
        }
    }

    let end = data
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("complete request head");
    CapturedRequest {
        head: String::from_utf8_lossy(&data[..end]).into_owned(),
        body: String::from_utf8_lossy(&data[end + 4..]).into_owned(),
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Unknown",
    }
}
