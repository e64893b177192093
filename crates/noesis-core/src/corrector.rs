//! Corrector - bounded-depth, reversible state adjustment
//!
//! A correction derives a small deterministic offset vector from the blake3
//! hash of its payload, adds it to the target register at 10% magnitude, and
//! renormalizes. The corrected state must clear the same alignment threshold
//! as any candidate; failures leave the register untouched. Depth is bounded:
//! a state that already carries the maximum number of correction records
//! rejects further corrections outright.

use crate::config::CoreConfig;
use crate::engine::candidate::{CorrectionRecord, State};
use crate::error::{CorrectionError, Result};
use crate::evaluator::{ActionOption, Evaluator};
use crate::events::{CoreEvent, EventBus};
use crate::profile::ContextualProfile;
use crate::register::Register;
use chrono::Utc;
use uuid::Uuid;

/// Fraction of the register's magnitude a correction may move it by
pub const CORRECTION_MAGNITUDE: f64 = 0.10;

/// Applies and reverts corrections
///
/// Keeps an in-flight attempt counter with guaranteed cleanup so depth
/// accounting survives early returns. Persistent depth lives on the `State`
/// itself as its correction records.
#[derive(Debug, Default)]
pub struct Corrector {
    in_flight: u32,
}

impl Corrector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `correction` to `target`, committing into `register` on success
    ///
    /// Fails with `DepthExceeded` before any mutation when the target already
    /// carries the maximum correction depth, and with `ThresholdViolation`
    /// (register untouched) when the corrected state's composite alignment
    /// falls below the threshold.
    #[allow(clippy::too_many_arguments)]
    pub fn apply(
        &mut self,
        config: &CoreConfig,
        register: &mut Register,
        evaluator: &mut Evaluator,
        bus: &mut EventBus,
        target: &State,
        correction: &str,
        profile: &ContextualProfile,
    ) -> Result<State> {
        let depth = target.correction_depth();
        if depth >= config.max_correction_depth {
            return Err(CorrectionError::DepthExceeded {
                depth,
                max: config.max_correction_depth,
            }
            .into());
        }

        let _guard = InFlightGuard::enter(&mut self.in_flight);

        let hash = blake3::hash(correction.as_bytes());
        let offsets = expand_offsets(&hash, register.len());

        // Work on a copy; the owned register is only touched after validation.
        let mut corrected = register.snapshot();
        if !corrected.add_scaled(&offsets, CORRECTION_MAGNITUDE) {
            bus.publish(CoreEvent::RegisterDegenerate {
                phase: "correction".to_string(),
            });
        }

        let option = ActionOption::new(format!("correction-{}", &hash.to_hex()[..8]), correction);
        let breakdown = evaluator.evaluate(&option, profile, bus);
        if breakdown.composite < config.alignment_threshold {
            return Err(CorrectionError::ThresholdViolation {
                score: breakdown.composite,
                threshold: config.alignment_threshold,
            }
            .into());
        }

        let record = CorrectionRecord {
            id: Uuid::new_v4(),
            payload_hash: hash.to_hex().to_string(),
            previous_register: register.snapshot(),
            alignment: breakdown.composite,
            timestamp: Utc::now(),
        };

        register.commit(&corrected);
        let dispersion = register.dispersion();

        let mut reflective = target.reflective.clone();
        reflective.corrections.push(record);

        let state = State::new(
            register.snapshot(),
            reflective,
            breakdown.composite,
            dispersion,
            Vec::new(),
            false,
        );

        bus.publish(CoreEvent::TemporalCorrection {
            depth: state.correction_depth(),
            score: breakdown.composite,
        });
        bus.publish(CoreEvent::StateChanged {
            state: Box::new(state.clone()),
        });

        Ok(state)
    }

    /// Undo the most recent correction on `target`
    ///
    /// Restores the register recorded before that correction and returns the
    /// rolled-back state.
    pub fn revert_last(
        &mut self,
        register: &mut Register,
        bus: &mut EventBus,
        target: &State,
    ) -> Result<State> {
        let mut reflective = target.reflective.clone();
        let Some(record) = reflective.corrections.pop() else {
            return Err(CorrectionError::NothingToRevert.into());
        };

        register.commit(&record.previous_register);
        let dispersion = register.dispersion();

        let state = State::new(
            register.snapshot(),
            reflective,
            target.alignment,
            dispersion,
            Vec::new(),
            false,
        );

        bus.publish(CoreEvent::StateChanged {
            state: Box::new(state.clone()),
        });

        Ok(state)
    }
}

/// Expand a blake3 digest into a unit-norm offset vector of `length`
///
/// Uses the extended output so every component gets its own byte; the same
/// payload always expands to the same offsets. The result has unit norm so
/// the correction magnitude is controlled entirely by the caller's scale.
fn expand_offsets(hash: &blake3::Hash, length: usize) -> Vec<f64> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(hash.as_bytes());
    let mut reader = hasher.finalize_xof();

    let mut bytes = vec![0u8; length];
    reader.fill(&mut bytes);

    let mut offsets: Vec<f64> = bytes
        .into_iter()
        .map(|b| f64::from(b) / 127.5 - 1.0)
        .collect();

    let norm = offsets.iter().map(|&x| x * x).sum::<f64>().sqrt();
    if norm > f64::EPSILON {
        for offset in &mut offsets {
            *offset /= norm;
        }
    }
    offsets
}

/// Increments an attempt counter on entry and decrements it on drop
///
/// Drop runs on every exit path, so the accounting holds even when
/// validation bails out early.
struct InFlightGuard<'a> {
    counter: &'a mut u32,
}

impl<'a> InFlightGuard<'a> {
    fn enter(counter: &'a mut u32) -> Self {
        *counter += 1;
        Self { counter }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        *self.counter -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::candidate::ReflectiveMeta;

    fn setup() -> (CoreConfig, Register, Evaluator, EventBus) {
        let config = CoreConfig {
            register_length: 8,
            ..Default::default()
        };
        let register = Register::from_components(vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
            .unwrap();
        (config, register, Evaluator::new(100), EventBus::new())
    }

    fn base_state(register: &Register) -> State {
        State::new(
            register.snapshot(),
            ReflectiveMeta::empty(),
            0.95,
            0.0,
            Vec::new(),
            false,
        )
    }

    const GOOD_CORRECTION: &str = "help and support everyone fairly";
    const BAD_CORRECTION: &str = "attack and destroy, harm whoever resists";

    #[test]
    fn test_correction_is_reproducible() {
        let (config, register, mut evaluator, mut bus) = setup();
        let mut corrector = Corrector::new();
        let state = base_state(&register);

        let mut reg_a = register.snapshot();
        let result_a = corrector
            .apply(
                &config,
                &mut reg_a,
                &mut evaluator,
                &mut bus,
                &state,
                GOOD_CORRECTION,
                &ContextualProfile::neutral(),
            )
            .unwrap();

        let mut reg_b = register.snapshot();
        let result_b = corrector
            .apply(
                &config,
                &mut reg_b,
                &mut evaluator,
                &mut bus,
                &state,
                GOOD_CORRECTION,
                &ContextualProfile::neutral(),
            )
            .unwrap();

        assert_eq!(result_a.register.components(), result_b.register.components());
    }

    #[test]
    fn test_correction_keeps_unit_norm() {
        let (config, mut register, mut evaluator, mut bus) = setup();
        let mut corrector = Corrector::new();
        let state = base_state(&register);

        let corrected = corrector
            .apply(
                &config,
                &mut register,
                &mut evaluator,
                &mut bus,
                &state,
                GOOD_CORRECTION,
                &ContextualProfile::neutral(),
            )
            .unwrap();

        assert!((corrected.register.norm() - 1.0).abs() < 1e-6);
        assert_eq!(corrected.correction_depth(), 1);
    }

    #[test]
    fn test_threshold_violation_leaves_register_untouched() {
        let (config, mut register, mut evaluator, mut bus) = setup();
        let mut corrector = Corrector::new();
        let state = base_state(&register);
        let before = register.snapshot();

        let result = corrector.apply(
            &config,
            &mut register,
            &mut evaluator,
            &mut bus,
            &state,
            BAD_CORRECTION,
            &ContextualProfile::neutral(),
        );

        assert!(matches!(
            result,
            Err(crate::error::NoesisError::Correction(
                CorrectionError::ThresholdViolation { .. }
            ))
        ));
        assert_eq!(register, before);
        assert_eq!(corrector.in_flight, 0);
    }

    #[test]
    fn test_depth_guard_rejects_ninth_correction() {
        let (config, mut register, mut evaluator, mut bus) = setup();
        let mut corrector = Corrector::new();
        let mut state = base_state(&register);

        for i in 0..8 {
            // Distinct payloads so each correction moves the register.
            let payload = format!("{} (revision {})", GOOD_CORRECTION, i);
            state = corrector
                .apply(
                    &config,
                    &mut register,
                    &mut evaluator,
                    &mut bus,
                    &state,
                    &payload,
                    &ContextualProfile::neutral(),
                )
                .unwrap();
        }
        assert_eq!(state.correction_depth(), 8);

        let after_eighth = register.snapshot();
        let result = corrector.apply(
            &config,
            &mut register,
            &mut evaluator,
            &mut bus,
            &state,
            GOOD_CORRECTION,
            &ContextualProfile::neutral(),
        );

        assert!(matches!(
            result,
            Err(crate::error::NoesisError::Correction(
                CorrectionError::DepthExceeded { depth: 8, max: 8 }
            ))
        ));
        // The register from attempt 8 is unchanged.
        assert_eq!(register, after_eighth);
    }

    #[test]
    fn test_revert_restores_previous_register() {
        let (config, mut register, mut evaluator, mut bus) = setup();
        let mut corrector = Corrector::new();
        let state = base_state(&register);
        let original = register.snapshot();

        let corrected = corrector
            .apply(
                &config,
                &mut register,
                &mut evaluator,
                &mut bus,
                &state,
                GOOD_CORRECTION,
                &ContextualProfile::neutral(),
            )
            .unwrap();
        assert_ne!(register, original);

        let reverted = corrector
            .revert_last(&mut register, &mut bus, &corrected)
            .unwrap();

        assert_eq!(register, original);
        assert_eq!(reverted.correction_depth(), 0);
    }

    #[test]
    fn test_revert_without_corrections_fails() {
        let (_config, mut register, _evaluator, mut bus) = setup();
        let mut corrector = Corrector::new();
        let state = base_state(&register);

        let result = corrector.revert_last(&mut register, &mut bus, &state);
        assert!(matches!(
            result,
            Err(crate::error::NoesisError::Correction(
                CorrectionError::NothingToRevert
            ))
        ));
    }
}
