//! Core types for Noesis
//!
//! Fundamental shared types:
//! - Timestamps
//! - Resource pressure signal
//! - Engine phase
//! - Small numeric helpers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type alias
pub type Timestamp = DateTime<Utc>;

/// Injected resource-pressure signal
///
/// Bounds candidate generation and can force an emergency collapse. The host
/// maps whatever it actually measures (battery, quota, load) onto this enum;
/// the core never touches a platform API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourcePressure {
    /// Resources plentiful - full candidate budget
    #[default]
    Normal,

    /// Resources constrained - reduced candidate budget
    Low,

    /// Resources exhausted - collapse must take the emergency path
    Critical,
}

impl ResourcePressure {
    /// Maximum number of candidates generated under this pressure level
    pub fn max_candidates(self) -> usize {
        match self {
            ResourcePressure::Normal => 3,
            ResourcePressure::Low | ResourcePressure::Critical => 2,
        }
    }

    /// Whether this level forces the emergency collapse path
    pub fn is_critical(self) -> bool {
        matches!(self, ResourcePressure::Critical)
    }
}

impl fmt::Display for ResourcePressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Engine phase
///
/// `Idle → Generating → (Collapsed | EmergencyCollapsed)`, re-entrant to
/// `Generating` on the next generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Generating,
    Collapsed,
    EmergencyCollapsed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Collapsed | Phase::EmergencyCollapsed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Clamp a value to [0, 1]
#[inline]
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_pressure_budgets() {
        assert_eq!(ResourcePressure::Normal.max_candidates(), 3);
        assert_eq!(ResourcePressure::Low.max_candidates(), 2);
        assert_eq!(ResourcePressure::Critical.max_candidates(), 2);
        assert!(ResourcePressure::Critical.is_critical());
        assert!(!ResourcePressure::Low.is_critical());
    }

    #[test]
    fn test_phase_terminal() {
        assert!(!Phase::Idle.is_terminal());
        assert!(!Phase::Generating.is_terminal());
        assert!(Phase::Collapsed.is_terminal());
        assert!(Phase::EmergencyCollapsed.is_terminal());
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(0.5), 0.5);
        assert_eq!(clamp01(1.5), 1.0);
    }
}
