//! Admission reachability check.
//!
//! # Responsibilities
//! - Probe a candidate backend once before it joins a group
//! - Bound the probe with a fixed timeout

use std::time::Duration;
use tokio::time;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use axum::http::{Method, Request};
use axum::body::Body;

use crate::config::AdmissionConfig;
use crate::load_balancer::backend::Backend;

/// One-shot HTTP probe used to gate admission.
#[derive(Clone)]
pub struct ReachabilityCheck {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl ReachabilityCheck {
    pub fn new(timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeout));

        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build(connector);

        Self { client, timeout }
    }

    pub fn from_config(config: &AdmissionConfig) -> Self {
        Self::new(Duration::from_secs(config.timeout_secs))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issue a GET to the backend address.
    ///
    /// Any HTTP response counts as reachable, whatever its status. A
    /// transport error or timeout does not; the pending request is dropped.
    pub async fn is_reachable(&self, backend: &Backend) -> bool {
        let address = backend.address();

        let request = match Request::builder()
            .method(Method::GET)
            .uri(backend.base_url())
            .header("user-agent", "api-gateway-admission-check")
            .body(Body::empty())
        {
            Ok(req) => req,
            Err(e) => {
                tracing::error!(address, error = %e, "Failed to build admission check request");
                return false;
            }
        };

        match time::timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) => {
                tracing::info!(address, status = %response.status(), "Admission check passed");
                true
            }
            Ok(Err(e)) => {
                tracing::warn!(address, error = %e, "Admission check failed: connection error");
                false
            }
            Err(_) => {
                tracing::warn!(address, timeout = ?self.timeout, "Admission check failed: timeout");
                false
            }
        }
    }
}

impl std::fmt::Debug for ReachabilityCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReachabilityCheck")
            .field("timeout", &self.timeout)
            .finish()
    }
}
