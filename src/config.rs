/*!
 * Pipe Configuration
 * Defaults from core::limits with environment overrides
 */

use crate::core::limits::{DEFAULT_PIPE_CAPACITY, ENV_PIPE_CAPACITY, ENV_TRACE_JSON};
use crate::core::types::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Environment override that was present but could not be applied
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ignoring invalid {variable}={value:?}: {reason}")]
pub struct EnvOverrideError {
    pub variable: &'static str,
    pub value: String,
    pub reason: String,
}

/// Settings for pipes created by a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PipeConfig {
    /// Item capacity of buffered pipes
    pub capacity: Size,
    /// Emit tracing output as JSON
    pub trace_json: bool,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_PIPE_CAPACITY,
            trace_json: false,
        }
    }
}

impl PipeConfig {
    /// Defaults overridden by `SHELL_PIPE_CAPACITY` and `SHELL_PIPE_TRACE_JSON`
    ///
    /// Values that fail to parse are ignored and logged at `warn`. Callers
    /// that read the environment before a subscriber is installed should
    /// use [`PipeConfig::from_env_checked`] and log the issues themselves.
    pub fn from_env() -> Self {
        let (config, issues) = Self::from_env_checked();
        for issue in &issues {
            warn!(variable = issue.variable, value = %issue.value, "{}", issue);
        }
        config
    }

    /// Like [`PipeConfig::from_env`], returning the ignored overrides instead of logging them
    pub fn from_env_checked() -> (Self, Vec<EnvOverrideError>) {
        let mut config = Self::default();
        let mut issues = Vec::new();

        if let Ok(raw) = std::env::var(ENV_PIPE_CAPACITY) {
            match raw.trim().parse::<Size>() {
                Ok(capacity) => config.capacity = capacity,
                Err(e) => issues.push(EnvOverrideError {
                    variable: ENV_PIPE_CAPACITY,
                    value: raw,
                    reason: e.to_string(),
                }),
            }
        }

        if let Ok(raw) = std::env::var(ENV_TRACE_JSON) {
            config.trace_json = parse_flag(&raw);
        }

        (config, issues)
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim(), "1" | "true" | "TRUE" | "True")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" true "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("yes"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipeConfig = serde_json::from_str(r#"{"capacity": 16}"#).unwrap();
        assert_eq!(config.capacity, 16);
        assert!(!config.trace_json);
    }
}
