mod followup;
mod generator;
mod observability;
mod sessions;
mod store;

pub use followup::*;
pub use generator::*;
pub use observability::*;
pub use sessions::*;
pub use store::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub followup: FollowUpConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.followup.poll_interval_secs == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "followup.poll_interval_secs".into(),
                message: "poll interval must be greater than 0".into(),
            });
        }

        if self.followup.idle_threshold_secs == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "followup.idle_threshold_secs".into(),
                message: "idle threshold must be greater than 0".into(),
            });
        }

        // A sweep slower than the threshold still works, just late.
        if self.followup.poll_interval_secs > self.followup.idle_threshold_secs {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "followup.poll_interval_secs".into(),
                message: format!(
                    "poll interval ({}s) exceeds idle threshold ({}s); follow-ups will be delayed",
                    self.followup.poll_interval_secs, self.followup.idle_threshold_secs
                ),
            });
        }

        if self.sessions.think_time_min_ms > self.sessions.think_time_max_ms {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "sessions.think_time_min_ms".into(),
                message: "think_time_min_ms must not exceed think_time_max_ms".into(),
            });
        }

        if self.sessions.stagger_min_ms > self.sessions.stagger_max_ms {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "sessions.stagger_min_ms".into(),
                message: "stagger_min_ms must not exceed stagger_max_ms".into(),
            });
        }

        if self.generator.provider == GeneratorKind::Gemini {
            if self.generator.model.is_empty() {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: "generator.model".into(),
                    message: "model must not be empty".into(),
                });
            }
            if self.generator.base_url.is_empty() {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: "generator.base_url".into(),
                    message: "base_url must not be empty".into(),
                });
            }
        }

        if self.store.state_path.as_os_str().is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "store.state_path".into(),
                message: "state_path must not be empty".into(),
            });
        }

        errors
    }
}
