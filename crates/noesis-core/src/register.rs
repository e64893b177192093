//! Cognitive register - the unit-norm state vector
//!
//! The register is a fixed-length vector of finite floats kept at unit
//! Euclidean norm after every mutation. The one documented exception is the
//! all-zero vector: `normalize` leaves it unchanged and reports the
//! degenerate case to the caller instead of raising.

use crate::error::{ConfigError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fixed-length normalized state vector
///
/// Length is fixed at construction and never changes. Snapshots are
/// independent copies: normalization mutates in place, so a snapshot handed
/// to a candidate must never alias the owning register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Register {
    components: Vec<f64>,
}

impl Register {
    /// Create a register with pseudo-random components in [-1, 1], normalized
    ///
    /// Fails only when `length` is zero.
    pub fn random(length: usize) -> Result<Self> {
        if length == 0 {
            return Err(ConfigError::InvalidRegisterLength(length).into());
        }

        let mut rng = rand::thread_rng();
        let components = (0..length).map(|_| rng.gen_range(-1.0..=1.0)).collect();

        let mut register = Self { components };
        register.normalize();
        Ok(register)
    }

    /// Create a register from explicit components
    ///
    /// Rejects empty input and non-finite values. Does not normalize; callers
    /// that need unit norm call `normalize` themselves.
    pub fn from_components(components: Vec<f64>) -> Result<Self> {
        if components.is_empty() {
            return Err(ConfigError::InvalidRegisterLength(0).into());
        }
        for (i, value) in components.iter().enumerate() {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteComponent(i).into());
            }
        }
        Ok(Self { components })
    }

    /// Register length
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Always false: zero-length registers are unconstructible
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component slice
    pub fn components(&self) -> &[f64] {
        &self.components
    }

    /// Euclidean (L2) norm
    pub fn norm(&self) -> f64 {
        self.components.iter().map(|&x| x * x).sum::<f64>().sqrt()
    }

    /// Normalize to unit norm in place
    ///
    /// Returns `false` and leaves the register unchanged when the norm is
    /// zero. Callers must not assume unit norm after a `false` return; the
    /// engine reports it as a degenerate-register event, not an error.
    pub fn normalize(&mut self) -> bool {
        let norm = self.norm();
        if norm < f64::EPSILON {
            return false;
        }

        for component in &mut self.components {
            *component /= norm;
        }
        true
    }

    /// Entropy-like dispersion of the register's energy, in [0, 1]
    ///
    /// Computed as `-Σ pᵢ·log2(pᵢ)` over `pᵢ = componentᵢ²`, normalized by
    /// `log2(len)` and clamped. Returns 0 for length ≤ 1 (a single component
    /// is maximally concentrated by definition).
    pub fn dispersion(&self) -> f64 {
        if self.components.len() <= 1 {
            return 0.0;
        }

        let entropy: f64 = -self
            .components
            .iter()
            .map(|&x| x * x)
            .filter(|&p| p > 0.0)
            .map(|p| p * p.log2())
            .sum::<f64>();

        let max_entropy = (self.components.len() as f64).log2();
        (entropy / max_entropy).clamp(0.0, 1.0)
    }

    /// Independent copy of this register
    ///
    /// Mutating the copy never affects the original.
    pub fn snapshot(&self) -> Register {
        self.clone()
    }

    /// Add `other` scaled by `scale` componentwise, then renormalize
    ///
    /// Used by the correction path. Lengths must match; mismatches are a
    /// caller bug and panic in debug builds only. Returns the renormalization
    /// result (`false` on the degenerate zero-sum case).
    pub(crate) fn add_scaled(&mut self, other: &[f64], scale: f64) -> bool {
        debug_assert_eq!(self.components.len(), other.len());
        for (component, delta) in self.components.iter_mut().zip(other) {
            *component += delta * scale;
        }
        self.normalize()
    }

    /// Replace the contents wholesale with another register's components
    pub(crate) fn commit(&mut self, other: &Register) {
        self.components.clear();
        self.components.extend_from_slice(&other.components);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_random_register_is_unit_norm() {
        let register = Register::random(256).unwrap();
        assert_eq!(register.len(), 256);
        assert!((register.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(Register::random(0).is_err());
        assert!(Register::from_components(vec![]).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(Register::from_components(vec![1.0, f64::NAN]).is_err());
        assert!(Register::from_components(vec![f64::INFINITY]).is_err());
    }

    #[test]
    fn test_zero_vector_normalize_is_noop() {
        let mut register = Register::from_components(vec![0.0, 0.0, 0.0]).unwrap();
        assert!(!register.normalize());
        assert_eq!(register.components(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_concentrated_register_has_zero_dispersion() {
        let register = Register::from_components(vec![1.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(register.dispersion(), 0.0);
    }

    #[test]
    fn test_uniform_register_has_max_dispersion() {
        let half = 0.5;
        let register = Register::from_components(vec![half, half, half, half]).unwrap();
        assert!((register.dispersion() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_component_dispersion_is_zero() {
        let register = Register::from_components(vec![1.0]).unwrap();
        assert_eq!(register.dispersion(), 0.0);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let register = Register::from_components(vec![3.0, 4.0]).unwrap();
        let mut copy = register.snapshot();
        copy.normalize();

        assert_eq!(register.components(), &[3.0, 4.0]);
        assert!((copy.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_scaled_renormalizes() {
        let mut register = Register::from_components(vec![1.0, 0.0]).unwrap();
        assert!(register.add_scaled(&[0.0, 1.0], 0.1));
        assert!((register.norm() - 1.0).abs() < 1e-9);
        assert!(register.components()[1] > 0.0);
    }

    #[test]
    fn test_add_scaled_reports_degenerate_sum() {
        let mut register = Register::from_components(vec![1.0, 0.0]).unwrap();
        assert!(!register.add_scaled(&[-1.0, 0.0], 1.0));
    }

    proptest! {
        #[test]
        fn prop_normalize_yields_unit_norm(
            components in proptest::collection::vec(-1000.0f64..1000.0, 1..64)
        ) {
            prop_assume!(components.iter().any(|&x| x.abs() > 1e-3));

            let mut register = Register::from_components(components).unwrap();
            prop_assert!(register.normalize());
            prop_assert!((register.norm() - 1.0).abs() < 1e-6);
        }

        #[test]
        fn prop_dispersion_in_unit_interval(
            components in proptest::collection::vec(-10.0f64..10.0, 1..64)
        ) {
            prop_assume!(components.iter().any(|&x| x.abs() > 1e-3));

            let mut register = Register::from_components(components).unwrap();
            register.normalize();
            let dispersion = register.dispersion();
            prop_assert!((0.0..=1.0).contains(&dispersion));
        }
    }
}
