//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and that
//! addresses and URLs parse. All errors are collected, not just the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be > 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }
    if config.timeouts.rpc_secs == 0 {
        errors.push(ValidationError::new("timeouts.rpc_secs", "must be > 0"));
    }
    if config.custody.timeout_secs == 0 {
        errors.push(ValidationError::new("custody.timeout_secs", "must be > 0"));
    }

    if config.polling.max_attempts == 0 {
        errors.push(ValidationError::new("polling.max_attempts", "must be >= 1"));
    }

    check_url(&mut errors, "custody.api_base_url", &config.custody.api_base_url);
    check_url(&mut errors, "solana.rpc_url", &config.solana.rpc_url);
    check_url_list(&mut errors, "evm.base_sepolia_rpc_urls", &config.evm.base_sepolia_rpc_urls);
    check_url_list(
        &mut errors,
        "evm.ethereum_sepolia_rpc_urls",
        &config.evm.ethereum_sepolia_rpc_urls,
    );

    if !matches!(config.solana.commitment.as_str(), "processed" | "confirmed" | "finalized") {
        errors.push(ValidationError::new(
            "solana.commitment",
            format!("unknown commitment '{}'", config.solana.commitment),
        ));
    }

    if !matches!(config.observability.log_format.as_str(), "pretty" | "compact") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("unknown format '{}'", config.observability.log_format),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if let Err(e) = url::Url::parse(value) {
        errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e)));
    }
}

fn check_url_list(errors: &mut Vec<ValidationError>, field: &str, values: &[String]) {
    if values.is_empty() {
        errors.push(ValidationError::new(field, "at least one URL is required"));
    }
    for value in values {
        check_url(errors, field, value);
    }
}
