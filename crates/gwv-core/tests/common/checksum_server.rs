//! Minimal HTTP/1.1 server standing in for the Gradle services API in tests.
//!
//! Serves a fixed table of `GET path -> (status, body)` routes; anything else
//! is a 404. Counts requests so tests can assert whether the API was hit.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

pub struct Route {
    pub path: String,
    pub status: u16,
    pub body: Vec<u8>,
}

impl Route {
    pub fn ok(path: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.to_string(),
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(path: &str, status: u16) -> Self {
        Self {
            path: path.to_string(),
            status,
            body: Vec::new(),
        }
    }
}

pub struct ChecksumServer {
    /// Base URL without trailing slash, e.g. "http://127.0.0.1:12345".
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl ChecksumServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread. `routes` receives the base URL so
/// listings can point at checksum files on the same server. The server runs
/// until the process exits.
pub fn start<F>(routes: F) -> ChecksumServer
where
    F: FnOnce(&str) -> Vec<Route>,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base_url = format!("http://127.0.0.1:{}", port);
    let table: HashMap<String, (u16, Vec<u8>)> = routes(&base_url)
        .into_iter()
        .map(|r| (r.path, (r.status, r.body)))
        .collect();
    let table = Arc::new(table);
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let table = Arc::clone(&table);
            counter.fetch_add(1, Ordering::SeqCst);
            thread::spawn(move || handle(stream, &table));
        }
    });
    ChecksumServer { base_url, hits }
}

fn handle(mut stream: std::net::TcpStream, table: &HashMap<String, (u16, Vec<u8>)>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    let (status, body) = match table.get(path) {
        Some((status, body)) => (*status, body.as_slice()),
        None => (404, &b""[..]),
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body);
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
