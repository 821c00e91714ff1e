//! Request path dispatch.
//!
//! # Responsibilities
//! - Resolve a request path to the next backend of the matching group
//! - Return an explicit no-match rather than a silent default
//!
//! # Design Decisions
//! - Routing state lives in the shared registry, so dispatch observes
//!   runtime add/remove immediately
//! - Longest prefix wins (see matcher.rs)

use std::sync::Arc;

use crate::load_balancer::{Backend, Registry};

/// Resolves request paths against the registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Backend that should serve `path`, or `None` when no prefix matches.
    pub fn resolve(&self, path: &str) -> Option<Arc<Backend>> {
        let backend = self.registry.lookup(path);
        if backend.is_none() {
            tracing::debug!(path, "No route matched");
        }
        backend
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}
