//! Backend health subsystem.
//!
//! # Data Flow
//! ```text
//! Registry::add(backend)
//!     → reachability.rs (single bounded GET)
//!     → admit or drop
//! ```
//!
//! # Design Decisions
//! - Advisory only: a backend that fails after admission is not evicted
//! - Eviction is operator driven through Registry::remove
//! - Probe runs before the registry lock is taken

pub mod reachability;

pub use reachability::ReachabilityCheck;
