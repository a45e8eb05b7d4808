//! Machine configuration.
//!
//! Settings can be built in code or read from a JSON file:
//!
//! ```json
//! { "unmapped": "fault", "halt_detection": true }
//! ```
//!
//! Missing fields take their defaults.

use crate::cpu::UnmappedPolicy;
use serde::{Serialize, Deserialize};
use std::path::Path;
use thiserror::Error;

/// Settings fixed at machine construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Behavior of accesses to 0x6001..=0x7FFF.
    pub unmapped: UnmappedPolicy,
    /// Mark the machine halted when it enters a jump-to-self loop.
    pub halt_detection: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            unmapped: UnmappedPolicy::Ignore,
            halt_detection: true,
        }
    }
}

impl MachineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Errors that can occur while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MachineConfig::default();
        assert_eq!(config.unmapped, UnmappedPolicy::Ignore);
        assert!(config.halt_detection);
    }

    #[test]
    fn test_parse_partial() {
        let config = MachineConfig::from_json_str(r#"{ "unmapped": "fault" }"#).unwrap();
        assert_eq!(config.unmapped, UnmappedPolicy::Fault);
        assert!(config.halt_detection);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = MachineConfig { unmapped: UnmappedPolicy::Fault, halt_detection: false };
        let json = config.to_json().unwrap();
        assert_eq!(MachineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let err = MachineConfig::from_json_str(r#"{ "unmapped": "mirror" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = MachineConfig::from_json_file("/nonexistent/hack-emu.json").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
