//! Upstream groups.
//!
//! # Responsibilities
//! - Hold the ordered backends that share one URL prefix
//! - Select the next backend according to the group's strategy
//! - Add and remove backends at runtime
//!
//! # Design Decisions
//! - One exclusive lock per group covers the host list and the strategy state,
//!   so selection, append and removal are linearizable
//! - The lock is never held across I/O; callers get an `Arc<Backend>` and
//!   release the lock before forwarding
//! - Different groups never contend with each other

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::load_balancer::{backend::Backend, round_robin::RoundRobin};

/// Load balancing policy of a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    RoundRobin,
}

/// Per-strategy selection state.
#[derive(Debug)]
enum Selector {
    RoundRobin(RoundRobin),
}

impl Selector {
    fn for_strategy(strategy: Strategy) -> Self {
        match strategy {
            Strategy::RoundRobin => Selector::RoundRobin(RoundRobin::new()),
        }
    }

    fn next_index(&mut self, len: usize) -> Option<usize> {
        match self {
            Selector::RoundRobin(rr) => rr.next_index(len),
        }
    }

    fn on_remove(&mut self, removed: usize, remaining: usize) {
        match self {
            Selector::RoundRobin(rr) => rr.on_remove(removed, remaining),
        }
    }
}

#[derive(Debug)]
struct GroupState {
    hosts: Vec<Arc<Backend>>,
    selector: Selector,
}

/// Backends sharing one URL prefix, load-balanced as a unit.
#[derive(Debug)]
pub struct UpstreamGroup {
    url_prefix: String,
    strategy: Strategy,
    state: Mutex<GroupState>,
}

impl UpstreamGroup {
    /// Create an empty group. The registry seeds it before publishing it.
    pub fn new(url_prefix: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            url_prefix: url_prefix.into(),
            strategy,
            state: Mutex::new(GroupState {
                hosts: Vec::new(),
                selector: Selector::for_strategy(strategy),
            }),
        }
    }

    /// Create a group holding a single backend.
    pub fn seeded(backend: Backend, strategy: Strategy) -> Self {
        let group = Self::new(backend.url_prefix().to_string(), strategy);
        group.state.lock().hosts.push(Arc::new(backend));
        group
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Append a backend.
    ///
    /// A backend registered for another prefix is a caller error: it is
    /// logged and ignored, and `false` is returned.
    pub fn add_host(&self, backend: Backend) -> bool {
        if backend.url_prefix() != self.url_prefix {
            tracing::warn!(
                group = %self.url_prefix,
                backend_prefix = %backend.url_prefix(),
                address = %backend.address(),
                "Backend prefix does not match group, ignoring"
            );
            return false;
        }

        let mut state = self.state.lock();
        state.hosts.push(Arc::new(backend));
        tracing::debug!(group = %self.url_prefix, hosts = state.hosts.len(), "Host added");
        true
    }

    /// Remove the first backend with `address`.
    ///
    /// Returns the number of hosts left, or `None` if no backend had that
    /// address.
    pub fn remove_host(&self, address: &str) -> Option<usize> {
        let mut state = self.state.lock();
        let index = state.hosts.iter().position(|b| b.address() == address)?;
        state.hosts.remove(index);
        let remaining = state.hosts.len();
        state.selector.on_remove(index, remaining);
        tracing::debug!(group = %self.url_prefix, address, remaining, "Host removed");
        Some(remaining)
    }

    /// Select the next backend.
    pub fn next(&self) -> Option<Arc<Backend>> {
        let mut state = self.state.lock();
        let len = state.hosts.len();
        let index = state.selector.next_index(len)?;
        state.hosts.get(index).cloned()
    }

    /// Snapshot of the current backends.
    pub fn hosts(&self) -> Vec<Arc<Backend>> {
        self.state.lock().hosts.clone()
    }

    /// Snapshot of the current backend addresses.
    pub fn addresses(&self) -> Vec<String> {
        self.state
            .lock()
            .hosts
            .iter()
            .map(|b| b.address().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
