//! Prefix-routing API gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                  GATEWAY                      │
//!     Client Request      │  ┌─────────┐    ┌────────────┐                │
//!     ────────────────────┼─▶│  http   │───▶│  routing   │                │
//!                         │  │ server  │    │ dispatcher │                │
//!                         │  └─────────┘    └─────┬──────┘                │
//!                         │                       │ longest prefix        │
//!                         │                       ▼                       │
//!                         │               ┌───────────────┐               │
//!     admin API ──────────┼──add/remove──▶│ load_balancer │               │
//!                         │               │ registry+group│               │
//!                         │               └───────┬───────┘               │
//!                         │                       │ round robin           │
//!                         │                       ▼                       │
//!     Client Response     │  ┌─────────┐    ┌────────────┐                │
//!     ◀───────────────────┼──│ stream  │◀───│  forward   │◀───────────────┼── Backend
//!                         │  └─────────┘    └────────────┘                │
//!                         └───────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod routing;

// Traffic management
pub mod health;
pub mod load_balancer;

// Cross-cutting concerns
pub mod admin;
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::{Gateway, GatewayHandle};
pub use lifecycle::Shutdown;
pub use load_balancer::{AddOutcome, Backend, Registry, RemoveOutcome};
