//! Configuration validation.
//!
//! Semantic checks only; serde handles the syntax. Every problem is
//! reported, not just the first one.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ApiConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("rate_limit.window_secs must be greater than zero")]
    ZeroWindow,

    #[error("rate_limit.default_limit must be greater than zero")]
    ZeroDefaultLimit,

    #[error("rate_limit.api_prefix `{0}` must start with `/`")]
    ApiPrefix(String),

    #[error("rate limit route `{0}` must start with `/`")]
    RoutePath(String),

    #[error("rate limit for `{0}` must be greater than zero")]
    ZeroRouteLimit(String),

    #[error("site.launch_date `{0}` is not an RFC 3339 timestamp")]
    LaunchDate(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ApiConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let rate_limit = &config.rate_limit;
    if rate_limit.window_secs == 0 {
        errors.push(ValidationError::ZeroWindow);
    }
    if rate_limit.default_limit == 0 {
        errors.push(ValidationError::ZeroDefaultLimit);
    }
    if !rate_limit.api_prefix.starts_with('/') {
        errors.push(ValidationError::ApiPrefix(rate_limit.api_prefix.clone()));
    }
    for (path, limit) in &rate_limit.routes {
        if !path.starts_with('/') {
            errors.push(ValidationError::RoutePath(path.clone()));
        }
        if *limit == 0 {
            errors.push(ValidationError::ZeroRouteLimit(path.clone()));
        }
    }

    if chrono::DateTime::parse_from_rfc3339(&config.site.launch_date).is_err() {
        errors.push(ValidationError::LaunchDate(config.site.launch_date.clone()));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
