//! Engine configuration
//!
//! All tunables exposed by the core, with validated setters. A failed set
//! leaves the previous value in place.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Valid range for the alignment threshold
pub const ALIGNMENT_THRESHOLD_RANGE: (f64, f64) = (0.80, 1.00);

/// Engine tunables
///
/// Defaults match the reference behavior: a candidate must clear 0.91
/// composite alignment, register dispersion above 0.04 forces an emergency
/// collapse, and at most 8 corrections may accumulate between resets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Minimum composite alignment a candidate or correction must reach
    pub alignment_threshold: f64,

    /// Register dispersion above which collapse takes the emergency path
    pub dispersion_threshold: f64,

    /// Minimum reflective score a candidate must carry through collapse
    pub reflective_threshold: f64,

    /// Maximum corrections accumulated between resets
    pub max_correction_depth: u32,

    /// Register length fixed at engine construction
    pub register_length: usize,

    /// Maximum retained decision records (FIFO eviction)
    pub history_capacity: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            alignment_threshold: 0.91,
            dispersion_threshold: 0.04,
            reflective_threshold: 0.25,
            max_correction_depth: 8,
            register_length: 256,
            history_capacity: 100,
        }
    }
}

impl CoreConfig {
    /// Validate every field, returning the first violation found
    pub fn validate(&self) -> Result<()> {
        check_range(
            "alignment_threshold",
            self.alignment_threshold,
            ALIGNMENT_THRESHOLD_RANGE.0,
            ALIGNMENT_THRESHOLD_RANGE.1,
        )?;
        check_range("dispersion_threshold", self.dispersion_threshold, 0.0, 1.0)?;
        check_range("reflective_threshold", self.reflective_threshold, 0.0, 1.0)?;

        if self.max_correction_depth == 0 {
            return Err(ConfigError::InvalidCorrectionDepth(self.max_correction_depth).into());
        }
        if self.register_length == 0 {
            return Err(ConfigError::InvalidRegisterLength(self.register_length).into());
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::InvalidHistoryCapacity(self.history_capacity).into());
        }

        Ok(())
    }

    /// Set the alignment threshold, rejecting values outside [0.80, 1.00]
    pub fn set_alignment_threshold(&mut self, value: f64) -> Result<()> {
        check_range(
            "alignment_threshold",
            value,
            ALIGNMENT_THRESHOLD_RANGE.0,
            ALIGNMENT_THRESHOLD_RANGE.1,
        )?;
        self.alignment_threshold = value;
        Ok(())
    }

    /// Set the dispersion threshold, rejecting values outside [0, 1]
    pub fn set_dispersion_threshold(&mut self, value: f64) -> Result<()> {
        check_range("dispersion_threshold", value, 0.0, 1.0)?;
        self.dispersion_threshold = value;
        Ok(())
    }

    /// Set the reflective threshold, rejecting values outside [0, 1]
    pub fn set_reflective_threshold(&mut self, value: f64) -> Result<()> {
        check_range("reflective_threshold", value, 0.0, 1.0)?;
        self.reflective_threshold = value;
        Ok(())
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::ThresholdOutOfRange {
            name,
            value,
            min,
            max,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.alignment_threshold, 0.91);
        assert_eq!(config.dispersion_threshold, 0.04);
        assert_eq!(config.reflective_threshold, 0.25);
        assert_eq!(config.max_correction_depth, 8);
        assert_eq!(config.register_length, 256);
    }

    #[test]
    fn test_alignment_threshold_range() {
        let mut config = CoreConfig::default();

        assert!(config.set_alignment_threshold(0.85).is_ok());
        assert_eq!(config.alignment_threshold, 0.85);

        // Out-of-range attempts leave the previous value in place
        assert!(config.set_alignment_threshold(0.5).is_err());
        assert_eq!(config.alignment_threshold, 0.85);

        assert!(config.set_alignment_threshold(1.01).is_err());
        assert!(config.set_alignment_threshold(f64::NAN).is_err());
        assert_eq!(config.alignment_threshold, 0.85);
    }

    #[test]
    fn test_invalid_lengths_rejected() {
        let config = CoreConfig {
            register_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CoreConfig {
            max_correction_depth: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CoreConfig {
            history_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
