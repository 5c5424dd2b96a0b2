//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Route names are present and unique
//! - Route patterns parse as URLs
//! - Observability values are recognized
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Only config files are validated; `RouteMatcher::add` accepts anything

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::routing::RoutePattern;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route #{index} has an empty name")]
    EmptyRouteName { index: usize },

    #[error("duplicate route name '{0}'")]
    DuplicateRouteName(String),

    #[error("route '{name}' pattern '{pattern}' is not a valid URL")]
    InvalidPattern { name: String, pattern: String },

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),

    #[error("unknown log format '{0}'")]
    UnknownLogFormat(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, route) in config.routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyRouteName { index });
        } else if !seen.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateRouteName(route.name.clone()));
        }

        if RoutePattern::parse(&route.pattern).is_none() {
            errors.push(ValidationError::InvalidPattern {
                name: route.name.clone(),
                pattern: route.pattern.clone(),
            });
        }
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }
    if !LOG_FORMATS.contains(&config.observability.log_format.as_str()) {
        errors.push(ValidationError::UnknownLogFormat(config.observability.log_format.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
