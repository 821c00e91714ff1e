//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (Dispatcher::resolve)
//!     → matcher.rs (longest registered prefix)
//!     → Return: next backend of that group, or NoMatch
//! ```
//!
//! # Design Decisions
//! - Routes are mutable at runtime (held by the registry)
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same table and path always pick the same group

pub mod matcher;
pub mod router;

pub use router::Dispatcher;
