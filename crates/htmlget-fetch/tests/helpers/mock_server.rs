use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Request heads received by a [`MockHttpServer`], in arrival order.
pub type RequestLog = Arc<Mutex<Vec<String>>>;

/// A minimal HTTP/1.1 server answering every request with canned bytes.
pub struct MockHttpServer {
    listener: TcpListener,
    addr: SocketAddr,
    log: RequestLog,
}

impl MockHttpServer {
    /// Create a new mock server bound to a random port.
    pub async fn new() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        Ok(Self {
            listener,
            addr,
            log: RequestLog::default(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Handle on the request heads this server will receive.
    pub fn log(&self) -> RequestLog {
        Arc::clone(&self.log)
    }

    /// Answer each connection with `response`, then close it.
    pub fn serve(self, response: Vec<u8>) -> tokio::task::JoinHandle<()> {
        self.serve_chunks(vec![response])
    }

    /// Answer each connection by writing `parts` in order, then close it.
    ///
    /// Write errors are ignored: the client is allowed to hang up early.
    pub fn serve_chunks(self, parts: Vec<Vec<u8>>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            while let Ok((stream, _)) = self.listener.accept().await {
                let parts = parts.clone();
                tokio::spawn(handle_connection(stream, parts, Arc::clone(&self.log)));
            }
        })
    }
}

async fn handle_connection(mut stream: TcpStream, parts: Vec<Vec<u8>>, log: RequestLog) {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    log.lock()
        .unwrap()
        .push(String::from_utf8_lossy(&request).into_owned());

    for part in parts {
        if stream.write_all(&part).await.is_err() {
            return;
        }
    }
    let _ = stream.shutdown().await;
}

/// Build a `Connection: close` response with the given status line and headers.
///
/// `Content-Length` is added from the body unless `headers` already has one.
pub fn response(status: &str, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let mut head = format!("HTTP/1.1 {status}\r\nConnection: close\r\n");
    for (name, value) in headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    if !headers.iter().any(|(name, _)| name.eq_ignore_ascii_case("content-length")) {
        head.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    head.push_str("\r\n");

    let mut bytes = head.into_bytes();
    bytes.extend_from_slice(body);
    bytes
}

/// Encode `data` as one HTTP/1.1 chunk.
pub fn chunk(data: &[u8]) -> Vec<u8> {
    let mut bytes = format!("{:x}\r\n", data.len()).into_bytes();
    bytes.extend_from_slice(data);
    bytes.extend_from_slice(b"\r\n");
    bytes
}

/// First line of every logged request.
pub fn request_lines(log: &RequestLog) -> Vec<String> {
    log.lock()
        .unwrap()
        .iter()
        .map(|head| head.lines().next().unwrap_or_default().to_string())
        .collect()
}
