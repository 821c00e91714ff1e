//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → balance + upstream entries fed to Registry::add at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once; runtime membership changes go through the admin API
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AdminConfig, AdmissionConfig, BalanceConfig, GatewayConfig, ListenerConfig,
    ObservabilityConfig, TransportConfig, UpstreamConfig,
};
