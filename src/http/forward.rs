//! Request forwarding.
//!
//! # Responsibilities
//! - Rewrite the inbound request onto the selected backend
//! - Propagate every request header, duplicates included
//! - Stream the backend response back unchanged
//! - Map transport failures to 502 Bad Gateway
//!
//! # Design Decisions
//! - Bodies are streamed in both directions; nothing is buffered
//! - One pooled client shared by all requests
//! - No retries and no fallback to another backend
//! - Dropping the response body (client gone) releases the backend connection

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode, Uri},
    response::IntoResponse,
};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::{TokioExecutor, TokioTimer},
};
use std::time::Duration;

use crate::config::TransportConfig;
use crate::load_balancer::Backend;

/// Proxies single requests to a backend over a shared connection pool.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
}

impl Forwarder {
    pub fn new(config: &TransportConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));
        connector.set_keepalive(Some(Duration::from_secs(config.keepalive_secs)));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build(connector);

        Self { client }
    }

    /// Forward `request` to `backend` and return the response to send back.
    ///
    /// The status of the returned response is the final status for logging:
    /// the backend's own on success, 502 on transport failure.
    pub async fn forward(&self, backend: &Backend, request: Request<Body>) -> Response<Body> {
        let outbound = match build_outbound(backend, request) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(backend = %backend.address(), error = %e, "Cannot build upstream request");
                return StatusCode::BAD_GATEWAY.into_response();
            }
        };

        match self.client.request(outbound).await {
            Ok(response) => {
                let (parts, body) = response.into_parts();
                Response::from_parts(parts, Body::new(body))
            }
            Err(e) => {
                tracing::warn!(backend = %backend.address(), error = %e, "Upstream error");
                StatusCode::BAD_GATEWAY.into_response()
            }
        }
    }
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder").finish_non_exhaustive()
    }
}

/// Build the outbound request: same method, path, query and body, all
/// headers except `Host`, target rewritten onto the backend.
fn build_outbound(backend: &Backend, request: Request<Body>) -> Result<Request<Body>, axum::http::Error> {
    let (parts, body) = request.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let uri: Uri = backend.target_uri(path_and_query).parse()?;

    let mut builder = Request::builder().method(parts.method).uri(uri);
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in parts.headers.iter() {
            if name == header::HOST {
                continue;
            }
            headers.append(name.clone(), value.clone());
        }
    }
    builder.body(body)
}
