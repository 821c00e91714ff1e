//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use api_gateway::config::GatewayConfig;
use api_gateway::{Gateway, GatewayHandle, Shutdown};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Router,
};
use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A mock backend started on an ephemeral port.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    headers: Arc<Mutex<Vec<HeaderMap>>>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Headers of every request received so far.
    pub fn received_headers(&self) -> Vec<HeaderMap> {
        self.headers.lock().clone()
    }
}

#[derive(Clone)]
struct MockState {
    body: Arc<Reply>,
    hits: Arc<AtomicUsize>,
    headers: Arc<Mutex<Vec<HeaderMap>>>,
}

enum Reply {
    Json(serde_json::Value),
    Text(String),
}

async fn mock_handler(State(state): State<MockState>, headers: HeaderMap) -> axum::response::Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.headers.lock().push(headers);
    match state.body.as_ref() {
        Reply::Json(json) => (StatusCode::OK, axum::Json(json.clone())).into_response(),
        Reply::Text(text) => (StatusCode::OK, text.clone()).into_response(),
    }
}

async fn start(reply: Reply) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let headers = Arc::new(Mutex::new(Vec::new()));

    let state = MockState {
        body: Arc::new(reply),
        hits: hits.clone(),
        headers: headers.clone(),
    };
    let app = Router::new().fallback(mock_handler).with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, hits, headers }
}

/// Backend answering every request with `{"Ping":"Pong"}`.
pub async fn start_json_backend() -> MockBackend {
    start(Reply::Json(serde_json::json!({ "Ping": "Pong" }))).await
}

/// Backend answering every request with `body` as plain text.
pub async fn start_text_backend(body: impl Into<String>) -> MockBackend {
    start(Reply::Text(body.into())).await
}

/// Backend that accepts connections and never answers.
pub struct HungBackend {
    pub addr: SocketAddr,
    accepted: Arc<AtomicUsize>,
}

impl HungBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }
}

pub async fn start_hung_backend() -> HungBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));

    let counter = accepted.clone();
    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            open.push(stream);
        }
    });

    HungBackend { addr, accepted }
}

/// Backend that streams a chunked body forever, one chunk every `interval`,
/// until a write fails.
pub struct StreamingBackend {
    pub addr: SocketAddr,
    disconnected: Arc<AtomicBool>,
}

impl StreamingBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Whether the peer has closed the streaming connection.
    pub fn disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }
}

pub async fn start_streaming_backend(interval: Duration) -> StreamingBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let disconnected = Arc::new(AtomicBool::new(false));

    let flag = disconnected.clone();
    tokio::spawn(async move {
        let Ok((mut stream, _)) = listener.accept().await else {
            return;
        };

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        let head = b"HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\ntransfer-encoding: chunked\r\n\r\n";
        if stream.write_all(head).await.is_err() {
            flag.store(true, Ordering::SeqCst);
            return;
        }

        let chunk = format!("400\r\n{}\r\n", "x".repeat(1024));
        loop {
            if stream.write_all(chunk.as_bytes()).await.is_err() {
                flag.store(true, Ordering::SeqCst);
                return;
            }
            tokio::time::sleep(interval).await;
        }
    });

    StreamingBackend { addr, disconnected }
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Gateway config bound to an ephemeral local port.
pub fn local_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config
}

/// A started gateway plus what is needed to stop it.
pub struct RunningGateway {
    pub gateway: Gateway,
    pub handle: GatewayHandle,
    pub shutdown: Shutdown,
}

impl RunningGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.handle.local_addr(), path)
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle.stopped().await;
    }
}

/// Start `gateway`.
pub async fn start_gateway(gateway: Gateway) -> RunningGateway {
    let shutdown = Shutdown::new();
    let handle = gateway.start(shutdown.subscribe()).await.unwrap();
    RunningGateway { gateway, handle, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
