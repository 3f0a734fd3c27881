//! Minimal HTTP/1.1 worker + blob store for integration tests.
//!
//! `HEAD /files/<name>` answers with `Content-Length` of the configured
//! resource. `GET /api/count_verbs?file_name=..&start=..&end=..` answers like
//! a worker: clamps the range to the resource, returns fixed counts as JSON,
//! or a 400/500 plain-text error.

use std::collections::HashSet;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WorkerOptions {
    pub file_name: String,
    pub resource_size: u64,
    pub past: u64,
    pub present: u64,
    /// Requests whose `start` is in this set get a 500.
    pub fail_starts: HashSet<u64>,
    /// Requests whose `start` is in this set get a 200 with a bad body.
    pub garbage_starts: HashSet<u64>,
    /// If false, HEAD returns 405.
    pub head_allowed: bool,
    /// Delay before answering each GET.
    pub delay: Duration,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            file_name: "spy.txt".to_string(),
            resource_size: 250,
            past: 5,
            present: 5,
            fail_starts: HashSet::new(),
            garbage_starts: HashSet::new(),
            head_allowed: true,
            delay: Duration::ZERO,
        }
    }
}

pub struct WorkerServer {
    /// e.g. "http://127.0.0.1:12345"
    pub base: String,
    gets: Arc<AtomicUsize>,
}

impl WorkerServer {
    pub fn endpoint(&self) -> String {
        format!("{}/api/count_verbs", self.base)
    }

    pub fn storage_url(&self) -> String {
        format!("{}/files", self.base)
    }

    /// Number of GET requests answered so far.
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start(opts: WorkerOptions) -> WorkerServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let opts = Arc::new(opts);
    let gets = Arc::new(AtomicUsize::new(0));
    let gets_in_server = Arc::clone(&gets);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let opts = Arc::clone(&opts);
            let gets = Arc::clone(&gets_in_server);
            thread::spawn(move || handle(stream, &opts, &gets));
        }
    });
    WorkerServer {
        base: format!("http://127.0.0.1:{}", port),
        gets,
    }
}

fn respond(stream: &mut std::net::TcpStream, status: &str, content_type: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn handle(mut stream: std::net::TcpStream, opts: &WorkerOptions, gets: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
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
    let target = parts.next().unwrap_or("/");
    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    if method.eq_ignore_ascii_case("HEAD") {
        if !opts.head_allowed || path != format!("/files/{}", opts.file_name) {
            let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
            return;
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nETag: \"0x1\"\r\n\r\n",
            opts.resource_size
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if method.eq_ignore_ascii_case("GET") && path == "/api/count_verbs" {
        gets.fetch_add(1, Ordering::SeqCst);
        if !opts.delay.is_zero() {
            thread::sleep(opts.delay);
        }
        let mut file_name = String::new();
        let mut start: Option<i64> = None;
        let mut end: Option<i64> = None;
        for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
            match k.as_ref() {
                "file_name" => file_name = v.into_owned(),
                "start" => start = v.parse().ok(),
                "end" => end = v.parse().ok(),
                _ => {}
            }
        }
        let (Some(start), Some(end)) = (start, end) else {
            respond(
                &mut stream,
                "400 Bad Request",
                "text/plain",
                "Invalid start or end parameters. Must be integers.",
            );
            return;
        };
        let size = opts.resource_size as i64;
        let start = start.max(0);
        let end = end.min(size);
        if start >= end || start >= size {
            let msg = format!(
                "Invalid range: start ({}) must be less than end ({}) and within file size ({})",
                start, end, size
            );
            respond(&mut stream, "400 Bad Request", "text/plain", &msg);
            return;
        }
        if opts.fail_starts.contains(&(start as u64)) {
            respond(
                &mut stream,
                "500 Internal Server Error",
                "text/plain",
                "Failed to process text",
            );
            return;
        }
        if opts.garbage_starts.contains(&(start as u64)) {
            respond(&mut stream, "200 OK", "application/json", r#"{"verb_count": "lots"}"#);
            return;
        }
        let body = format!(
            r#"{{"verb_count": {}, "detailed_counts": {{"past": {}, "present": {}, "future": 0, "base": 0, "gerund": 0, "participle": 0}}, "file_name": "{}", "start": {}, "end": {}, "total_file_size": {}, "execution_time_seconds": 0.012}}"#,
            opts.past + opts.present,
            opts.past,
            opts.present,
            file_name,
            start,
            end,
            size
        );
        respond(&mut stream, "200 OK", "application/json", &body);
        return;
    }

    let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
}
