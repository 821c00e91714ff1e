//! Backend descriptor.
//!
//! # Responsibilities
//! - Represent a single upstream server for one URL prefix
//! - Validate and normalize the target address once, at construction
//! - Build outbound URIs for forwarded requests

use std::fmt;
use url::Url;

use crate::error::GatewayError;

/// A single backend server registered under a URL prefix.
///
/// Immutable once built. A backend re-registered under a different prefix is
/// a new descriptor, never a shared one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    /// Address as given by the operator, e.g. `http://10.0.0.3:8080`.
    address: String,
    /// Normalized base URL, without a trailing slash.
    base: String,
    /// Prefix of the group that owns this backend.
    url_prefix: String,
    /// Optional display name.
    name: Option<String>,
}

impl Backend {
    /// Create a backend descriptor.
    ///
    /// Accepts `http://host:port[/base]` or a bare `host:port`. The prefix
    /// must start with `/`.
    pub fn new(
        address: impl Into<String>,
        url_prefix: impl Into<String>,
        name: Option<String>,
    ) -> Result<Self, GatewayError> {
        let url_prefix = url_prefix.into();
        validate_prefix(&url_prefix)?;
        let address = address.into();
        let base = normalize_address(&address)?;
        Ok(Self {
            address,
            base,
            url_prefix,
            name: name.filter(|n| !n.is_empty()),
        })
    }

    /// The address as registered.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The URL prefix this backend serves.
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Base URL used for reachability checks.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Target URI for a request whose path and query are `path_and_query`.
    pub fn target_uri(&self, path_and_query: &str) -> String {
        if path_and_query.starts_with('/') {
            format!("{}{}", self.base, path_and_query)
        } else {
            format!("{}/{}", self.base, path_and_query)
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", self.address, name),
            None => f.write_str(&self.address),
        }
    }
}

/// An empty prefix would match every path, and one without a leading `/`
/// never matches any.
pub fn validate_prefix(prefix: &str) -> Result<(), GatewayError> {
    if prefix.starts_with('/') {
        Ok(())
    } else {
        Err(GatewayError::InvalidPrefix {
            prefix: prefix.to_string(),
        })
    }
}

fn normalize_address(address: &str) -> Result<String, GatewayError> {
    let invalid = |reason: &str| GatewayError::InvalidAddress {
        address: address.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(invalid("address is empty"));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| invalid(&e.to_string()))?;
    if url.scheme() != "http" {
        return Err(invalid("only http backends are supported"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed"));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}
