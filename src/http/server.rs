//! Gateway HTTP server.
//!
//! # Responsibilities
//! - Own the registry, dispatcher and forwarder of one gateway
//! - Seed the registry from configuration
//! - Create the Axum Router that proxies every path
//! - Bind the listener and run the accept loop in the background
//! - Apply the artificial delay and log one line per request

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::health::ReachabilityCheck;
use crate::http::forward::Forwarder;
use crate::load_balancer::{AddOutcome, Backend, Registry, RemoveOutcome};
use crate::observability::metrics;
use crate::routing::Dispatcher;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub forwarder: Forwarder,
    pub delay: Duration,
}

/// A prefix-routing reverse proxy.
///
/// Cheap to clone; clones share the same registry.
#[derive(Clone)]
pub struct Gateway {
    registry: Arc<Registry>,
    state: AppState,
    bind_address: String,
}

impl Gateway {
    /// Create a gateway with an empty registry.
    pub fn new(config: &GatewayConfig) -> Self {
        let admission = config
            .admission
            .check_before_admit
            .then(|| ReachabilityCheck::from_config(&config.admission));
        let registry = Arc::new(Registry::new(config.strategy, admission));

        let state = AppState {
            dispatcher: Dispatcher::new(registry.clone()),
            forwarder: Forwarder::new(&config.transport),
            delay: config.listener.delay(),
        };

        Self {
            registry,
            state,
            bind_address: config.listener.bind_address.clone(),
        }
    }

    /// Create a gateway and register every backend the configuration
    /// declares, balance blocks first.
    ///
    /// Fails when no backend could be admitted.
    pub async fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let gateway = Self::new(config);

        for group in &config.balance {
            for addr in &group.addr {
                let backend = Backend::new(addr.as_str(), group.url_prefix.as_str(), None)?;
                gateway.add(backend).await;
            }
        }
        for upstream in &config.upstreams {
            let backend = Backend::new(
                upstream.addr.as_str(),
                upstream.url_prefix.as_str(),
                Some(upstream.name.clone()),
            )?;
            gateway.add(backend).await;
        }

        if gateway.registry.is_empty() {
            tracing::error!("No upstreams detected");
            return Err(GatewayError::NoUpstreams);
        }

        gateway.registry.log_route_table();
        Ok(gateway)
    }

    /// Admit a backend at runtime.
    pub async fn add(&self, backend: Backend) -> AddOutcome {
        self.registry.add(backend).await
    }

    /// Remove a backend at runtime.
    pub fn remove(&self, backend: &Backend) -> RemoveOutcome {
        self.registry.remove(backend)
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Build the Axum router with all middleware layers.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(self.state.clone())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Bind the listen address and serve in the background.
    ///
    /// Returns as soon as the listener is bound. The accept loop stops when
    /// `shutdown` fires; connections already accepted are left to finish on
    /// their own.
    pub async fn start(&self, shutdown: broadcast::Receiver<()>) -> Result<GatewayHandle, GatewayError> {
        if self.registry.is_empty() {
            tracing::error!("No upstreams registered, refusing to start");
            return Err(GatewayError::NoUpstreams);
        }

        let listener = TcpListener::bind(&self.bind_address)
            .await
            .map_err(|source| GatewayError::Bind {
                address: self.bind_address.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        let task = tokio::spawn(serve(listener, self.router(), shutdown));
        tracing::info!(address = %local_addr, "Gateway started");

        Ok(GatewayHandle { local_addr, task })
    }
}

/// Handle to a running gateway.
#[derive(Debug)]
pub struct GatewayHandle {
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl GatewayHandle {
    /// Address the gateway is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait until the accept loop has stopped.
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Gateway task failed");
        }
    }
}

/// Run the accept loop until it fails or `shutdown` fires.
pub(crate) async fn serve(listener: TcpListener, router: Router, mut shutdown: broadcast::Receiver<()>) {
    tokio::select! {
        result = axum::serve(listener, router).into_future() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Server error");
            }
        }
        _ = shutdown.recv() => {
            tracing::info!("Shutdown signal received");
        }
    }
    tracing::info!("Gateway stopped");
}

/// Main proxy handler.
/// Resolves the path, waits out the delay, and forwards the request.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let Some(backend) = state.dispatcher.resolve(uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    let response = state.forwarder.forward(&backend, request).await;
    let status = response.status();

    tracing::info!(
        elapsed_us = elapsed_micros(start_time.elapsed()),
        method = %method,
        uri = %uri,
        backend = %backend.address(),
        status = status.as_u16(),
        "Request forwarded"
    );
    metrics::record_request(method.as_str(), status.as_u16(), backend.address(), start_time);

    response
}

/// Microseconds, saturating at `u64::MAX`.
fn elapsed_micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}
