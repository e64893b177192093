//! Contextual profile - externally supplied scoring context
//!
//! A profile maps named dimensions (e.g. "group-orientation",
//! "risk-tolerance") to values in [0, 1]. The provider that derives profiles
//! from locale or regional tables lives outside this crate; the core only
//! consumes them. Out-of-range inputs are clamped at this boundary, never
//! trusted raw, and a profile is immutable once built.

use crate::types::{clamp01, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named normalized dimensions plus provider confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualProfile {
    dimensions: BTreeMap<String, f64>,
    confidence: f64,
    region: String,
    timestamp: Timestamp,
}

impl ContextualProfile {
    /// Build a profile, clamping every dimension and the confidence to [0, 1]
    pub fn new(
        dimensions: impl IntoIterator<Item = (String, f64)>,
        confidence: f64,
        region: impl Into<String>,
    ) -> Self {
        let dimensions = dimensions
            .into_iter()
            .map(|(name, value)| (name, clamp01(value)))
            .collect();

        Self {
            dimensions,
            confidence: clamp01(confidence),
            region: region.into(),
            timestamp: Utc::now(),
        }
    }

    /// Neutral profile: no dimensions, full confidence, unspecified region
    pub fn neutral() -> Self {
        Self::new(Vec::new(), 1.0, "unspecified")
    }

    /// Dimension value, or `None` when the provider did not supply it
    pub fn dimension(&self, name: &str) -> Option<f64> {
        self.dimensions.get(name).copied()
    }

    /// All dimensions in name order
    pub fn dimensions(&self) -> impl Iterator<Item = (&str, f64)> {
        self.dimensions.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Provider confidence in [0, 1]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Region label
    pub fn region(&self) -> &str {
        &self.region
    }

    /// When the profile was produced
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
