//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::load_balancer::Strategy;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, artificial delay).
    pub listener: ListenerConfig,

    /// Load balancing strategy for every group.
    pub strategy: Strategy,

    /// Admission check settings.
    pub admission: AdmissionConfig,

    /// Outbound transport settings.
    pub transport: TransportConfig,

    /// Pre-grouped backends: one prefix, many addresses.
    pub balance: Vec<BalanceConfig>,

    /// Single-backend entries.
    #[serde(rename = "upstream")]
    pub upstreams: Vec<UpstreamConfig>,

    /// Admin API settings.
    pub admin: AdminConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// Total number of backend declarations across both forms.
    pub fn declared_backends(&self) -> usize {
        self.balance.iter().map(|b| b.addr.len()).sum::<usize>() + self.upstreams.len()
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9000").
    pub bind_address: String,

    /// Artificial delay applied before forwarding, in milliseconds.
    pub delay_ms: u64,
}

impl ListenerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9000".to_string(),
            delay_ms: 0,
        }
    }
}

/// Admission check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Probe each backend before admitting it.
    pub check_before_admit: bool,

    /// Probe timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            check_before_admit: false,
            timeout_secs: 5,
        }
    }
}

/// Outbound connection pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Idle pooled connection timeout in seconds.
    pub idle_timeout_secs: u64,

    /// Maximum idle connections kept per backend host.
    pub max_idle_per_host: usize,

    /// TCP keepalive interval in seconds.
    pub keepalive_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            idle_timeout_secs: 90,
            max_idle_per_host: 100,
            keepalive_secs: 30,
        }
    }
}

/// A prefix served by several backends.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BalanceConfig {
    /// URL prefix to match.
    pub url_prefix: String,

    /// Backend addresses, in round-robin order.
    pub addr: Vec<String>,
}

/// A single backend entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Backend address (e.g., "http://127.0.0.1:3000").
    pub addr: String,

    /// URL prefix to match.
    pub url_prefix: String,
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            bind_address: "127.0.0.1:9100".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
