//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and prefixes before anything is registered
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;
use crate::error::GatewayError;
use crate::load_balancer::backend::{validate_prefix, Backend};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a socket address: {:?}", config.listener.bind_address),
        ));
    }

    if config.admission.check_before_admit && config.admission.timeout_secs == 0 {
        errors.push(ValidationError::new("admission.timeout_secs", "must be greater than 0"));
    }

    if config.declared_backends() == 0 {
        errors.push(ValidationError::new("balance/upstream", "no backends declared"));
    }

    for (i, group) in config.balance.iter().enumerate() {
        let field = format!("balance[{}]", i);
        check_prefix(&mut errors, &field, &group.url_prefix);
        if group.addr.is_empty() {
            errors.push(ValidationError::new(&field, "addr list is empty"));
        }
        for addr in &group.addr {
            check_address(&mut errors, &field, addr, &group.url_prefix);
        }
    }

    for (i, upstream) in config.upstreams.iter().enumerate() {
        let field = format!("upstream[{}]", i);
        check_prefix(&mut errors, &field, &upstream.url_prefix);
        check_address(&mut errors, &field, &upstream.addr, &upstream.url_prefix);
    }

    if config.admin.enabled && config.admin.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "admin.bind_address",
            format!("not a socket address: {:?}", config.admin.bind_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_prefix(errors: &mut Vec<ValidationError>, field: &str, prefix: &str) {
    if let Err(e) = validate_prefix(prefix) {
        errors.push(ValidationError::new(format!("{}.url_prefix", field), e.to_string()));
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &str, addr: &str, prefix: &str) {
    // A bad prefix is already reported by `check_prefix`.
    if let Err(e @ GatewayError::InvalidAddress { .. }) = Backend::new(addr, prefix, None) {
        errors.push(ValidationError::new(format!("{}.addr", field), e.to_string()));
    }
}
