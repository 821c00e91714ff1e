//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Seed registry → Start gateway + admin listeners
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → Accept loops stop
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then registry, then listeners
//! - Stopping closes the listeners; in-flight requests are not drained

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
