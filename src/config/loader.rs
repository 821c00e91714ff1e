//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    let config: GatewayConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::Strategy;

    const SAMPLE: &str = r#"
strategy = "round_robin"

[listener]
bind_address = "127.0.0.1:9000"
delay_ms = 25

[admission]
check_before_admit = true

[[balance]]
url_prefix = "/pong"
addr = ["http://localhost:9001", "http://localhost:9002", "http://localhost:9003"]

[[upstream]]
name = "service-1"
addr = "http://localhost:9011"
url_prefix = "/ping1"

[[upstream]]
addr = "localhost:9012"
url_prefix = "/ping2"
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.listener.delay_ms, 25);
        assert_eq!(config.strategy, Strategy::RoundRobin);
        assert!(config.admission.check_before_admit);
        assert_eq!(config.admission.timeout_secs, 5);
        assert_eq!(config.balance[0].addr.len(), 3);
        assert_eq!(config.upstreams.len(), 2);
        assert_eq!(config.upstreams[1].name, "");
        assert_eq!(config.declared_backends(), 5);
        assert_eq!(config.transport.max_idle_per_host, 100);
    }

    #[test]
    fn test_defaults_with_minimal_config() {
        let config = parse_config(
            "[[upstream]]\naddr = \"localhost:1\"\nurl_prefix = \"/\"\n",
        )
        .unwrap();
        assert_eq!(config.listener.delay_ms, 0);
        assert!(!config.admission.check_before_admit);
        assert!(!config.admin.enabled);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(parse_config("listener = 3"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_error_message() {
        let err = parse_config("").unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: balance/upstream: no backends declared");
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
