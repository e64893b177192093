//! Decision engine - candidate generation and collapse
//!
//! The engine owns the register, the evaluator, the event bus, and the
//! current candidate set. Generation and collapse never return errors: every
//! unsafe condition on that path resolves through the emergency collapse,
//! which is the guaranteed-safe terminal outcome.

pub mod candidate;

use crate::config::CoreConfig;
use crate::corrector::Corrector;
use crate::error::Result;
use crate::evaluator::{ActionOption, Evaluator};
use crate::events::{CoreEvent, EventBus};
use crate::profile::ContextualProfile;
use crate::register::Register;
use crate::rubric::signals;
use crate::types::{Phase, ResourcePressure};
use candidate::{Candidate, ReflectiveMeta, State};
use chrono::Utc;
use rand::Rng;
use std::sync::mpsc::Receiver;

/// Dispersion reported by emergency states
///
/// Fixed, not recomputed: the emergency path promises a known-low dispersion
/// regardless of the register it replaced.
pub const EMERGENCY_DISPERSION: f64 = 0.02;

/// Component range the emergency register is drawn from
const EMERGENCY_COMPONENT_RANGE: (f64, f64) = (0.05, 0.15);

/// The decision-evaluation core
///
/// Single logical owner of all mutable state; all operations are synchronous
/// transitions. See `create_candidates`, `collapse`, `apply_correction`.
#[derive(Debug)]
pub struct DecisionEngine {
    config: CoreConfig,
    register: Register,
    candidates: Vec<Candidate>,
    phase: Phase,
    pressure: ResourcePressure,
    evaluator: Evaluator,
    corrector: Corrector,
    bus: EventBus,
}

impl DecisionEngine {
    /// Create an engine from a validated configuration
    pub fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;
        let register = Register::random(config.register_length)?;
        let evaluator = Evaluator::new(config.history_capacity);

        Ok(Self {
            config,
            register,
            candidates: Vec::new(),
            phase: Phase::Idle,
            pressure: ResourcePressure::Normal,
            evaluator,
            corrector: Corrector::new(),
            bus: EventBus::new(),
        })
    }

    /// Create an engine with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(CoreConfig::default())
    }

    /// Subscribe to the engine's event stream
    pub fn subscribe(&mut self) -> Receiver<CoreEvent> {
        self.bus.subscribe()
    }

    /// Inject the current resource-pressure signal
    pub fn set_resource_pressure(&mut self, pressure: ResourcePressure) {
        self.pressure = pressure;
    }

    /// Generate candidates from the given options, in input order
    ///
    /// At most `min(options.len(), max_allowed)` options are considered,
    /// where `max_allowed` comes from the resource-pressure signal. An option
    /// becomes a candidate only when its composite alignment clears the
    /// threshold. Every kept candidate gets probability `1/max_allowed`,
    /// deliberately not renormalized over the kept count. Replaces the
    /// current candidate set; never fails.
    pub fn create_candidates(
        &mut self,
        profile: &ContextualProfile,
        options: &[ActionOption],
    ) -> usize {
        self.phase = Phase::Generating;

        let max_allowed = self.pressure.max_candidates();
        let bound = options.len().min(max_allowed);
        let probability = 1.0 / max_allowed as f64;

        let mut kept = Vec::with_capacity(bound);
        for option in &options[..bound] {
            let breakdown = self.evaluator.evaluate(option, profile, &mut self.bus);
            if breakdown.composite < self.config.alignment_threshold {
                continue;
            }

            kept.push(Candidate {
                option: option.clone(),
                register: self.register.snapshot(),
                alignment: breakdown.composite,
                reflective: self.evaluator.reflective_score(option),
                probability,
                created_at: Utc::now(),
            });
        }

        let count = kept.len();
        self.candidates = kept;
        self.bus.publish(CoreEvent::CandidatesCreated { count });
        count
    }

    /// Collapse the candidate set to a single committed state
    ///
    /// Emergency conditions are checked first: register dispersion over the
    /// threshold, any retained candidate below the reflective threshold,
    /// critical resource pressure, or an empty candidate set. All of them
    /// route to the emergency collapse instead of raising.
    pub fn collapse(&mut self) -> State {
        let must_fallback = self.register.dispersion() > self.config.dispersion_threshold
            || self
                .candidates
                .iter()
                .any(|c| c.reflective < self.config.reflective_threshold)
            || self.pressure.is_critical()
            || self.candidates.is_empty();

        if must_fallback {
            return self.emergency_collapse();
        }

        let retained = std::mem::take(&mut self.candidates);
        let mut winner: Option<Candidate> = None;
        for candidate in retained {
            if candidate.alignment < self.config.alignment_threshold
                || candidate.reflective < self.config.reflective_threshold
            {
                continue;
            }
            // First-encountered wins ties: replace only on strictly greater.
            let better = winner
                .as_ref()
                .map(|best| candidate.combined_score() > best.combined_score())
                .unwrap_or(true);
            if better {
                winner = Some(candidate);
            }
        }

        let Some(winner) = winner else {
            return self.emergency_collapse();
        };

        self.register.commit(&winner.register);
        let dispersion = self.register.dispersion();

        let reflective = ReflectiveMeta {
            self_reference: winner.reflective,
            uncertainty_markers: signals::reflective_markers(&winner.option.content),
            corrections: Vec::new(),
        };

        let state = State::new(
            self.register.snapshot(),
            reflective,
            winner.alignment,
            dispersion,
            vec![winner],
            false,
        );

        self.phase = Phase::Collapsed;
        self.bus.publish(CoreEvent::CollapseApplied {
            state: Box::new(state.clone()),
        });
        self.bus.publish(CoreEvent::StateChanged {
            state: Box::new(state.clone()),
        });
        state
    }

    /// Rebuild the register from the safe low-dispersion fallback
    ///
    /// Components are drawn from a small positive range, not derived from any
    /// input data, then normalized. The resulting state reports the minimum
    /// acceptable alignment and a fixed low dispersion. This path never
    /// panics.
    fn emergency_collapse(&mut self) -> State {
        let mut rng = rand::thread_rng();
        let (low, high) = EMERGENCY_COMPONENT_RANGE;
        let components: Vec<f64> = (0..self.register.len())
            .map(|_| rng.gen_range(low..=high))
            .collect();

        let mut fallback = Register::from_components(components)
            .unwrap_or_else(|_| self.register.snapshot());
        if !fallback.normalize() {
            self.bus.publish(CoreEvent::RegisterDegenerate {
                phase: "emergency-collapse".to_string(),
            });
        }
        self.register.commit(&fallback);
        self.candidates.clear();

        let state = State::new(
            self.register.snapshot(),
            ReflectiveMeta::empty(),
            self.config.alignment_threshold,
            EMERGENCY_DISPERSION,
            Vec::new(),
            true,
        );

        self.phase = Phase::EmergencyCollapsed;
        self.bus.publish(CoreEvent::CollapseEmergency {
            state: Box::new(state.clone()),
        });
        self.bus.publish(CoreEvent::StateChanged {
            state: Box::new(state.clone()),
        });
        state
    }

    /// Apply a bounded-depth correction to a previously produced state
    ///
    /// Propagates failures to the caller; correction is an optional
    /// enhancement with no safe automatic substitute. See [`Corrector`].
    pub fn apply_correction(
        &mut self,
        target: &State,
        correction: &str,
        profile: &ContextualProfile,
    ) -> Result<State> {
        self.corrector.apply(
            &self.config,
            &mut self.register,
            &mut self.evaluator,
            &mut self.bus,
            target,
            correction,
            profile,
        )
    }

    /// Revert the most recent correction on `target`
    pub fn revert_correction(&mut self, target: &State) -> Result<State> {
        self.corrector
            .revert_last(&mut self.register, &mut self.bus, target)
    }

    /// Full reinitialization: new register, no candidates, zeroed depth
    ///
    /// Built completely before anything is replaced, so the caller never
    /// observes a partial reset.
    pub fn reset(&mut self) -> Result<()> {
        let register = Register::random(self.config.register_length)?;
        let evaluator = Evaluator::new(self.config.history_capacity);

        self.register = register;
        self.evaluator = evaluator;
        self.candidates.clear();
        self.corrector = Corrector::new();
        self.phase = Phase::Idle;
        Ok(())
    }

    /// Current engine phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The owned register
    pub fn register(&self) -> &Register {
        &self.register
    }

    /// Retained candidates awaiting collapse
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// The evaluator and its decision history
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Current configuration
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Adjust the alignment threshold; rejects values outside [0.80, 1.00]
    pub fn set_alignment_threshold(&mut self, value: f64) -> Result<()> {
        self.config.set_alignment_threshold(value)
    }
}
