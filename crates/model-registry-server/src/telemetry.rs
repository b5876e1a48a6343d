//! Structured logging setup
//!
//! `RUST_LOG` takes precedence over the configured level when set.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Log level or filter directive
    pub log_level: String,

    /// Whether to use JSON formatting
    pub json_format: bool,

    /// Whether to include thread IDs
    pub include_thread_ids: bool,

    /// Whether to include target module
    pub include_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_format: false,
            include_thread_ids: false,
            include_target: true,
        }
    }
}

impl TelemetryConfig {
    /// Create a new telemetry config
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every setting from the logging section
    pub fn from_logging(logging: &LoggingConfig) -> Self {
        Self::new()
            .with_log_level(logging.level.clone())
            .with_json_format(logging.json_format)
            .with_thread_ids(logging.include_thread_ids)
            .with_target(logging.include_target)
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON formatting
    pub fn with_json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    /// Configure thread ID inclusion
    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.include_thread_ids = enabled;
        self
    }

    /// Configure target module inclusion
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.include_target = enabled;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level))
    }
}

/// Install the global subscriber
///
/// # Example
///
/// ```rust,ignore
/// let config = TelemetryConfig::new()
///     .with_log_level("debug")
///     .with_json_format(true);
///
/// init_with_config(config);
/// ```
pub fn init_with_config(config: TelemetryConfig) {
    let env_filter = config.env_filter();

    if config.json_format {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_timer(fmt::time::SystemTime)
                    .with_target(config.include_target)
                    .with_thread_ids(config.include_thread_ids),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_timer(fmt::time::SystemTime)
                    .with_target(config.include_target)
                    .with_thread_ids(config.include_thread_ids),
            )
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_config_default() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.json_format);
        assert!(!config.include_thread_ids);
        assert!(config.include_target);
    }

    #[test]
    fn test_from_logging() {
        let logging = LoggingConfig {
            level: "model_registry_catalog=debug".to_string(),
            json_format: true,
            ..LoggingConfig::default()
        };
        let config = TelemetryConfig::from_logging(&logging);

        assert_eq!(config.log_level, "model_registry_catalog=debug");
        assert!(config.json_format);
        assert!(config.include_target);
    }
}
