//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, trace layer)
//!     → routing::Dispatcher (path → backend, or 404)
//!     → artificial delay
//!     → forward.rs (pooled client, streamed body, 502 on transport error)
//!     → Send to client
//! ```

pub mod forward;
pub mod server;

pub use forward::Forwarder;
pub use server::{AppState, Gateway, GatewayHandle};
