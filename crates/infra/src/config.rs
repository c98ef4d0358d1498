//! Configuration loading from the process environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `COLDSTORE_LOG` | `info` | tracing filter directive |
//! | `COLDSTORE_LOG_FORMAT` | `json` | `json` or `pretty` |
//! | `COLDSTORE_ADVANCE_AFTER_RETRY` | `false` | continue pending tasks after a successful retry |

use coldstore_observability::{LogFormat, ParseLogFormatError};
use coldstore_provisioning::OrchestratorOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_LOG: &str = "COLDSTORE_LOG";
pub const ENV_LOG_FORMAT: &str = "COLDSTORE_LOG_FORMAT";
pub const ENV_ADVANCE_AFTER_RETRY: &str = "COLDSTORE_ADVANCE_AFTER_RETRY";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Effective settings; serializable so the resolved values can be logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    pub log_filter: String,
    pub log_format: LogFormat,
    pub advance_after_retry: bool,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            log_format: LogFormat::Json,
            advance_after_retry: false,
        }
    }
}

impl ProvisioningConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup (tests, embedded callers).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            config.log_filter = filter;
        }

        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            config.log_format = raw.parse().map_err(|e: ParseLogFormatError| ConfigError::Invalid {
                var: ENV_LOG_FORMAT,
                value: raw.clone(),
                reason: e.to_string(),
            })?;
        }

        if let Some(raw) = lookup(ENV_ADVANCE_AFTER_RETRY) {
            config.advance_after_retry = parse_bool(ENV_ADVANCE_AFTER_RETRY, &raw)?;
        }

        Ok(config)
    }

    pub fn orchestrator_options(&self) -> OrchestratorOptions {
        OrchestratorOptions {
            advance_after_retry: self.advance_after_retry,
        }
    }

    /// Install the tracing subscriber described by this config.
    pub fn init_logging(&self) {
        coldstore_observability::init_with(&self.log_filter, self.log_format);
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
