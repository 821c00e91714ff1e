//! Upstream group registry.
//!
//! # Responsibilities
//! - Map URL prefixes to upstream groups
//! - Create a group on the first backend for a prefix, delete it with the last
//! - Gate admission through the optional reachability check
//! - Resolve request paths to the next backend
//!
//! # Design Decisions
//! - One registry lock covers matching and structural changes, so a group is
//!   never observed empty and two first-adds cannot race
//! - The admission probe runs before the lock is taken
//! - Add and remove report what happened instead of failing

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, hash_map::Entry};
use std::sync::Arc;

use crate::health::ReachabilityCheck;
use crate::load_balancer::{
    backend::Backend,
    group::{Strategy, UpstreamGroup},
};
use crate::observability::metrics;
use crate::routing::matcher::longest_prefix;

/// Result of [`Registry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    /// No group existed for the prefix; one was created.
    CreatedGroup,
    /// The backend joined an existing group.
    JoinedGroup,
    /// The admission check failed; nothing changed.
    Unreachable,
}

impl AddOutcome {
    pub fn is_admitted(self) -> bool {
        !matches!(self, AddOutcome::Unreachable)
    }
}

/// Result of [`Registry::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RemoveOutcome {
    Removed { remaining: usize },
    /// The last backend was removed and the group deleted.
    GroupDeleted,
    UnknownPrefix,
    UnknownAddress,
}

/// One row of the route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub url_prefix: String,
    pub hosts: Vec<String>,
}

/// Map from URL prefix to upstream group.
#[derive(Debug)]
pub struct Registry {
    groups: Mutex<HashMap<String, UpstreamGroup>>,
    strategy: Strategy,
    admission: Option<ReachabilityCheck>,
}

impl Registry {
    /// Create an empty registry. With `admission` set, every add is probed
    /// first.
    pub fn new(strategy: Strategy, admission: Option<ReachabilityCheck>) -> Self {
        Self {
            groups: Mutex::new(HashMap::new()),
            strategy,
            admission,
        }
    }

    /// Admit a backend.
    pub async fn add(&self, backend: Backend) -> AddOutcome {
        if let Some(check) = &self.admission {
            if !check.is_reachable(&backend).await {
                tracing::warn!(
                    url_prefix = %backend.url_prefix(),
                    address = %backend.address(),
                    "Backend not admitted: unreachable"
                );
                return AddOutcome::Unreachable;
            }
        }

        self.insert(backend)
    }

    fn insert(&self, backend: Backend) -> AddOutcome {
        let mut groups = self.groups.lock();
        let prefix = backend.url_prefix().to_string();

        let (outcome, hosts) = match groups.entry(prefix.clone()) {
            Entry::Occupied(entry) => {
                let group = entry.get();
                group.add_host(backend);
                (AddOutcome::JoinedGroup, group.len())
            }
            Entry::Vacant(entry) => {
                tracing::info!(url_prefix = %prefix, "Creating upstream group");
                entry.insert(UpstreamGroup::seeded(backend, self.strategy));
                (AddOutcome::CreatedGroup, 1)
            }
        };

        metrics::record_group_hosts(&prefix, hosts);
        outcome
    }

    /// Remove a backend from the group for its prefix.
    pub fn remove(&self, backend: &Backend) -> RemoveOutcome {
        self.remove_address(backend.url_prefix(), backend.address())
    }

    /// Remove `address` from the group registered for `url_prefix`.
    pub fn remove_address(&self, url_prefix: &str, address: &str) -> RemoveOutcome {
        let mut groups = self.groups.lock();

        let Some(group) = groups.get(url_prefix) else {
            tracing::warn!(url_prefix, address, "Cannot remove: no group for prefix");
            return RemoveOutcome::UnknownPrefix;
        };

        match group.remove_host(address) {
            None => {
                tracing::warn!(url_prefix, address, "Cannot remove: address not in group");
                RemoveOutcome::UnknownAddress
            }
            Some(0) => {
                groups.remove(url_prefix);
                metrics::record_group_hosts(url_prefix, 0);
                tracing::info!(url_prefix, address, "Last host removed, group deleted");
                RemoveOutcome::GroupDeleted
            }
            Some(remaining) => {
                metrics::record_group_hosts(url_prefix, remaining);
                tracing::info!(url_prefix, address, remaining, "Host removed");
                RemoveOutcome::Removed { remaining }
            }
        }
    }

    /// Next backend for the longest registered prefix of `path`.
    pub fn lookup(&self, path: &str) -> Option<Arc<Backend>> {
        let groups = self.groups.lock();
        let prefix = longest_prefix(groups.keys().map(String::as_str), path)?;
        groups.get(prefix)?.next()
    }

    /// Snapshot of the route table, sorted by prefix.
    pub fn routes(&self) -> Vec<RouteEntry> {
        let groups = self.groups.lock();
        let mut routes: Vec<RouteEntry> = groups
            .values()
            .map(|group| RouteEntry {
                url_prefix: group.url_prefix().to_string(),
                hosts: group.addresses(),
            })
            .collect();
        routes.sort_by(|a, b| a.url_prefix.cmp(&b.url_prefix));
        routes
    }

    /// Number of registered groups.
    pub fn len(&self) -> usize {
        self.groups.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.lock().is_empty()
    }

    /// Write the route table to the log, one line per host.
    pub fn log_route_table(&self) {
        for route in self.routes() {
            for host in &route.hosts {
                tracing::info!(url_prefix = %route.url_prefix, destination = %host, "Route");
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(Strategy::default(), None)
    }
}
