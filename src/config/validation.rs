//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate instance URLs (http/https scheme, non-empty host)
//! - Validate value ranges (port, thresholds, timeouts)
//! - Detect conflicting routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use url::Url;

use crate::config::schema::{GatewayConfig, ServiceConfig};
use crate::routing::matcher::PathPrefixMatcher;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("'{0}' is not a valid port")]
    InvalidPort(String),

    #[error("service path '{0}' must start with '/'")]
    InvalidPath(String),

    #[error("service path '{0}' is configured more than once")]
    DuplicatePath(String),

    #[error("No instance URL configured for service path: {0}")]
    NoInstances(String),

    #[error("{url} is not a valid URL: {reason}")]
    MalformedUrl { url: String, reason: String },

    #[error("{0} is not a valid http or https URL")]
    UnsupportedScheme(String),

    #[error("{0} is not a valid URL. Host is missing")]
    MissingHost(String),

    #[error("breaker failure_threshold must be greater than 0")]
    ZeroFailureThreshold,

    #[error("breaker reset_timeout_secs must be greater than 0")]
    ZeroResetTimeout,

    #[error("'{0}' is not a valid metrics address")]
    InvalidMetricsAddress(String),
}

/// Parse and check one instance URL.
pub fn parse_instance_url(raw: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(raw).map_err(|e| ValidationError::MalformedUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ValidationError::UnsupportedScheme(raw.to_string()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::MissingHost(raw.to_string()));
    }
    Ok(url)
}

impl ServiceConfig {
    /// All instance URLs, parsed. Fails on the first invalid one.
    pub fn instance_urls(&self) -> Result<Vec<Url>, ValidationError> {
        self.instances.iter().map(|raw| parse_instance_url(raw)).collect()
    }
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.port.parse::<u16>().is_err() {
        errors.push(ValidationError::InvalidPort(config.port.clone()));
    }

    let mut seen = HashSet::new();
    for service in &config.services {
        if !service.path.starts_with('/') {
            errors.push(ValidationError::InvalidPath(service.path.clone()));
        }
        let normalised = PathPrefixMatcher::new(service.path.as_str());
        if !seen.insert(normalised.prefix().to_string()) {
            errors.push(ValidationError::DuplicatePath(service.path.clone()));
        }
        if service.instances.is_empty() {
            errors.push(ValidationError::NoInstances(service.path.clone()));
        }
        errors.extend(
            service
                .instances
                .iter()
                .filter_map(|raw| parse_instance_url(raw).err()),
        );
    }

    if config.breaker.failure_threshold == 0 {
        errors.push(ValidationError::ZeroFailureThreshold);
    }
    if config.breaker.reset_timeout_secs == 0 {
        errors.push(ValidationError::ZeroResetTimeout);
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidMetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(path: &str, instances: &[&str]) -> ServiceConfig {
        ServiceConfig {
            path: path.to_string(),
            instances: instances.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn accepts_http_and_https_instances() {
        assert!(parse_instance_url("http://127.0.0.1:8081").is_ok());
        assert!(parse_instance_url("https://api.example.com/base").is_ok());
    }

    #[test]
    fn rejects_bad_instance_urls() {
        assert_eq!(
            parse_instance_url("ftp://files.example.com"),
            Err(ValidationError::UnsupportedScheme("ftp://files.example.com".into()))
        );
        assert!(matches!(
            parse_instance_url("localhost:8080"),
            Err(ValidationError::UnsupportedScheme(_)) | Err(ValidationError::MalformedUrl { .. })
        ));
        assert!(matches!(
            parse_instance_url("not a url"),
            Err(ValidationError::MalformedUrl { .. })
        ));
    }

    #[test]
    fn valid_config_passes() {
        let config = GatewayConfig {
            services: vec![
                service("/", &["http://127.0.0.1:8081"]),
                service("/api", &["http://127.0.0.1:8082", "https://10.0.0.2"]),
            ],
            ..Default::default()
        };
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = GatewayConfig {
            port: "http".into(),
            services: vec![
                service("api", &["http://127.0.0.1:8081"]),
                service("/empty", &[]),
                service("/bad", &["ftp://x", "http://ok:1"]),
                service("/bad/", &["http://ok:2"]),
            ],
            ..Default::default()
        };
        config.breaker.failure_threshold = 0;
        config.observability.metrics_address = Some("nowhere".into());

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidPort("http".into())));
        assert!(errors.contains(&ValidationError::InvalidPath("api".into())));
        assert!(errors.contains(&ValidationError::NoInstances("/empty".into())));
        assert!(errors.contains(&ValidationError::UnsupportedScheme("ftp://x".into())));
        assert!(errors.contains(&ValidationError::DuplicatePath("/bad/".into())));
        assert!(errors.contains(&ValidationError::ZeroFailureThreshold));
        assert!(errors.contains(&ValidationError::InvalidMetricsAddress("nowhere".into())));
        assert_eq!(errors.len(), 7);
    }

    #[test]
    fn instance_urls_preserve_order() {
        let s = service("/api", &["http://a:1", "http://b:2"]);
        let urls = s.instance_urls().unwrap();
        assert_eq!(urls[0].as_str(), "http://a:1/");
        assert_eq!(urls[1].as_str(), "http://b:2/");
    }
}
