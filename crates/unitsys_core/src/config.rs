//! Engine-wide tunables.
//!
//! # Invariants
//! - A config accepted by [`EngineConfig::validate`] never makes the manager
//!   panic or loop.
//! - Missing JSON fields take their defaults.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Tunables read once at manager construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Durations above this are reported as slow.
    pub slow_threshold_ms: f64,
    /// Lower bound enforced by the default range validator.
    pub value_min: f64,
    /// Upper bound enforced by the default range validator.
    pub value_max: f64,
    pub history_capacity: usize,
    /// Draw a new random value before each calculation of a random unit.
    pub redraw_random_on_calculate: bool,
    /// Route plain `calculate` calls through the command history.
    pub record_commands: bool,
    pub random_seed: Option<u64>,
    pub max_slow_records: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slow_threshold_ms: 16.0,
            value_min: -1_000_000.0,
            value_max: 1_000_000.0,
            history_capacity: 256,
            redraw_random_on_calculate: true,
            record_commands: false,
            random_seed: None,
            max_slow_records: 64,
        }
    }
}

impl EngineConfig {
    /// Parses JSON and validates the result.
    ///
    /// # Errors
    /// - `Parse` when the text is not a JSON object of known shape.
    /// - Any error from [`EngineConfig::validate`].
    pub fn from_json_str(raw: &str) -> Result<Self, EngineConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineConfigError> {
        if !self.slow_threshold_ms.is_finite() || self.slow_threshold_ms < 0.0 {
            return Err(EngineConfigError::InvalidThreshold(self.slow_threshold_ms));
        }
        if !self.value_min.is_finite() || !self.value_max.is_finite() || self.value_min > self.value_max
        {
            return Err(EngineConfigError::InvalidValueRange {
                min: self.value_min,
                max: self.value_max,
            });
        }
        if self.history_capacity == 0 {
            return Err(EngineConfigError::ZeroHistoryCapacity);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum EngineConfigError {
    Parse(serde_json::Error),
    InvalidThreshold(f64),
    InvalidValueRange { min: f64, max: f64 },
    ZeroHistoryCapacity,
}

impl Display for EngineConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid engine config json: {err}"),
            Self::InvalidThreshold(value) => {
                write!(f, "slow_threshold_ms must be finite and >= 0, got {value}")
            }
            Self::InvalidValueRange { min, max } => {
                write!(f, "value range [{min}, {max}] is not a finite ordered range")
            }
            Self::ZeroHistoryCapacity => write!(f, "history_capacity must be at least 1"),
        }
    }
}

impl Error for EngineConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EngineConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineConfig, EngineConfigError};

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"slow_threshold_ms": 8.0, "random_seed": 7}"#).unwrap();
        assert_eq!(config.slow_threshold_ms, 8.0);
        assert_eq!(config.random_seed, Some(7));
        assert_eq!(config.history_capacity, 256);
        assert!(config.redraw_random_on_calculate);
    }

    #[test]
    fn rejects_inverted_value_range() {
        let err = EngineConfig::from_json_str(r#"{"value_min": 5.0, "value_max": 1.0}"#).unwrap_err();
        assert!(matches!(err, EngineConfigError::InvalidValueRange { .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = EngineConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, EngineConfigError::Parse(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
