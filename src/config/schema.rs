//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Route definitions, in match priority order.
    pub routes: Vec<RouteConfig>,

    /// Loading overlay settings.
    pub presentation: PresentationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A single route: a URL pattern and the name its dispatches carry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging and dispatch output.
    pub name: String,

    /// URL template; path components wrapped in `!` are variables.
    pub pattern: String,

    /// Disabled routes still match but their handler declines.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Presentation stack configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Delay before a delayed show materializes, in milliseconds.
    pub show_delay_ms: u64,
}

impl PresentationConfig {
    pub fn show_delay(&self) -> Duration {
        Duration::from_millis(self.show_delay_ms)
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self { show_delay_ms: 500 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format (pretty, json).
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.routes.is_empty());
        assert_eq!(config.presentation.show_delay(), Duration::from_millis(500));
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_route_enabled_by_default() {
        let config: AppConfig = toml::from_str(
            r#"
            [[routes]]
            name = "item"
            pattern = "app://host/item/!id!"
            "#,
        )
        .unwrap();
        assert_eq!(config.routes.len(), 1);
        assert!(config.routes[0].enabled);
    }
}
