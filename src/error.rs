//! Gateway error types.
//!
//! Only construction and startup failures surface as errors. Per-request
//! failures are translated to HTTP status codes by the forwarder and never
//! reach this type.

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors raised while building or starting the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid backend address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("invalid url prefix {prefix:?}: must start with '/'")]
    InvalidPrefix { prefix: String },

    #[error("no upstreams registered, refusing to start")]
    NoUpstreams,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
