//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Registry::add(backend)
//!     → admission check (optional)
//!     → registry.rs (create group or append)
//!
//! Dispatcher::resolve(path)
//!     → registry.rs (longest prefix → group)
//!     → group.rs (strategy picks next host)
//!         - round_robin.rs (rotate through hosts)
//!     → Arc<Backend> handed to the forwarder
//! ```
//!
//! # Design Decisions
//! - Two lock scopes: registry structure, and per-group host list + cursor
//! - Strategy is a tagged variant owned by the group; nothing outside the
//!   group sees strategy state
//! - Empty groups are deleted, never left registered

pub mod backend;
pub mod group;
pub mod registry;
pub mod round_robin;

pub use backend::Backend;
pub use group::{Strategy, UpstreamGroup};
pub use registry::{AddOutcome, Registry, RemoveOutcome, RouteEntry};
