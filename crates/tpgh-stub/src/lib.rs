//! # tpgh-stub
//!
//! A `tiny_http` server bound to `127.0.0.1:0` that records every request and
//! answers through a caller-supplied closure. Client crates point their base
//! URLs at [`StubServer::url`] so tests exercise the real `reqwest` code path,
//! including query encoding, headers and status handling.
//!
//! ```no_run
//! use tpgh_stub::{StubResponse, StubServer};
//!
//! let server = StubServer::start(|req| match req.path.as_str() {
//!     "/api/v1/Projects" => StubResponse::json(200, serde_json::json!({"Items": []})),
//!     _ => StubResponse::empty(404),
//! });
//! let base_url = server.url();
//! ```

use std::io::Read;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

/// One request as seen by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Decoded query pairs in wire order.
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// First value of a query parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Header value, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Request body parsed as JSON (`Null` when empty or not JSON).
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// Canned response returned by the handler closure.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub content_type: &'static str,
}

impl StubResponse {
    #[must_use]
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        Self {
            status,
            body: value.to_string().into_bytes(),
            content_type: "application/json",
        }
    }

    #[must_use]
    pub const fn bytes(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            body,
            content_type: "application/octet-stream",
        }
    }

    #[must_use]
    pub const fn empty(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            content_type: "text/plain",
        }
    }
}

type Handler = dyn Fn(&RecordedRequest) -> StubResponse + Send + Sync;

/// Running stub server. Stops accepting requests when dropped.
pub struct StubServer {
    server: Arc<tiny_http::Server>,
    port: u16,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    /// Bind to a random local port and serve on a background thread.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind; this crate is test-only.
    #[must_use]
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> StubResponse + Send + Sync + 'static,
    {
        let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").expect("stub server should bind"));
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .expect("stub server should listen on an IP address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let worker_server = Arc::clone(&server);
        let worker_requests = Arc::clone(&requests);
        thread::spawn(move || {
            for request in worker_server.incoming_requests() {
                serve(request, handler.as_ref(), &worker_requests);
            }
        });

        Self {
            server,
            port,
            requests,
        }
    }

    /// Base URL without a trailing slash, e.g. `http://127.0.0.1:49152`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Snapshot of every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.server.unblock();
    }
}

fn serve(
    mut request: tiny_http::Request,
    handler: &Handler,
    requests: &Mutex<Vec<RecordedRequest>>,
) {
    let recorded = record(&mut request);
    let reply = handler(&recorded);
    requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(recorded);

    let mut response = tiny_http::Response::from_data(reply.body).with_status_code(reply.status);
    if let Ok(header) = tiny_http::Header::from_bytes("Content-Type", reply.content_type) {
        response = response.with_header(header);
    }
    let _ = request.respond(response);
}

fn record(request: &mut tiny_http::Request) -> RecordedRequest {
    let mut body = Vec::new();
    let _ = request.as_reader().read_to_end(&mut body);

    let (path, query) = match reqwest::Url::parse(&format!("http://stub{}", request.url())) {
        Ok(url) => (
            url.path().to_string(),
            url.query_pairs()
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect(),
        ),
        Err(_) => (request.url().to_string(), Vec::new()),
    };

    RecordedRequest {
        method: request.method().to_string().to_ascii_uppercase(),
        path,
        query,
        headers: request
            .headers()
            .iter()
            .map(|header| (header.field.to_string(), header.value.to_string()))
            .collect(),
        body,
    }
}
